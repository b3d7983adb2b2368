//! Published test vectors and fixed-IV snapshots

use block_ciphers::{
    aes, aes_decrypt, aes_encrypt, des, des_decrypt, des_encrypt, parse_hex, to_hex, Aes, BlockCipher,
    CipherError, CipherModes, Des, Mode,
};

fn hex(s: &str) -> Vec<u8> {
    parse_hex(s).unwrap()
}

#[test]
fn aes_fips197_appendix_c() {
    let plaintext = hex("00112233445566778899aabbccddeeff");
    let cases = [
        ("000102030405060708090a0b0c0d0e0f", "69c4e0d86a7b0430d8cdb78070b4c55a"),
        ("000102030405060708090a0b0c0d0e0f1011121314151617", "dda97ca4864cdfe06eaf70a0ec0d7191"),
        (
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            "8ea2b7ca516745bfeafc49904b496089",
        ),
    ];

    for (key, expected) in cases {
        let keys = aes::key_expansion(&hex(key)).unwrap();
        let block = aes::encrypt_block(&plaintext, &keys).unwrap();
        assert_eq!(to_hex(&block), expected, "key {}", key);
        assert_eq!(aes::decrypt_block(&block, &keys).unwrap().to_vec(), plaintext);
    }
}

#[test]
fn aes_sp800_38a_first_blocks() {
    let cipher = Aes::new(&hex("2b7e151628aed2a6abf7158809cf4f3c")).unwrap();
    let plaintext = hex("6bc1bee22e409f96e93d7e117393172a");

    let mut block = plaintext.clone();
    cipher.encrypt_block(&mut block).unwrap();
    assert_eq!(to_hex(&block), "3ad77bb40d7a3660a89ecaf32466ef97");

    // First CBC block: only the IV feeds into it, padding lands in the next block.
    let cbc = CipherModes::cbc_encrypt(&cipher, &plaintext, &hex("000102030405060708090a0b0c0d0e0f")).unwrap();
    assert_eq!(cbc.len(), 32);
    assert_eq!(to_hex(&cbc[..16]), "7649abac8119b246cee98e9b12e9197d");
}

#[test]
fn des_textbook_vectors() {
    let cases = [
        ("133457799bbcdff1", "0123456789abcdef", "85e813540f0ab405"),
        ("0e329232ea6d0d73", "8787878787878787", "0000000000000000"),
    ];

    for (key, plaintext, expected) in cases {
        let keys = des::key_schedule(&hex(key)).unwrap();
        let block = des::encrypt_block(&hex(plaintext), &keys).unwrap();
        assert_eq!(to_hex(&block), expected);
        assert_eq!(to_hex(&des::decrypt_block(&block, &keys).unwrap()), plaintext);
    }
}

#[test]
fn hello_world_cbc_snapshot() {
    let key = hex("2b7e151628aed2a6abf7158809cf4f3c");
    let iv = hex("000102030405060708090a0b0c0d0e0f");

    let encrypted = aes_encrypt(b"Hello World!", &key, Mode::Cbc, Some(&iv)).unwrap();
    assert_eq!(to_hex(&encrypted.ciphertext), "1357e9b93b14f0afcea5f7dffc1040b9");
    assert_eq!(encrypted.iv.as_deref(), Some(&iv[..]));

    let decrypted = aes_decrypt(&encrypted.ciphertext, &key, Mode::Cbc, Some(&iv)).unwrap();
    assert_eq!(decrypted, b"Hello World!");
}

#[test]
fn roundtrip_every_key_size_and_mode() {
    let messages: [&[u8]; 4] = [b"", b"a", b"exactly16bytes!!", b"The quick brown fox jumps over the lazy dog"];

    for mode in [Mode::Ecb, Mode::Cbc] {
        for key_len in aes::KEY_SIZES {
            let key: Vec<u8> = (0..key_len as u8).collect();
            for msg in messages {
                let encrypted = aes_encrypt(msg, &key, mode, None).unwrap();
                assert_eq!(encrypted.ciphertext.len() % 16, 0);
                assert!(encrypted.ciphertext.len() > msg.len());
                let decrypted = aes_decrypt(&encrypted.ciphertext, &key, mode, encrypted.iv.as_deref()).unwrap();
                assert_eq!(decrypted, msg);
            }
        }

        for msg in messages {
            let encrypted = des_encrypt(msg, b"deskey!!", mode, None).unwrap();
            assert_eq!(encrypted.ciphertext.len() % 8, 0);
            let decrypted = des_decrypt(&encrypted.ciphertext, b"deskey!!", mode, encrypted.iv.as_deref()).unwrap();
            assert_eq!(decrypted, msg);
        }
    }
}

#[test]
fn rejects_bad_inputs() {
    assert!(matches!(
        aes_encrypt(b"x", &[0u8; 15], Mode::Ecb, None),
        Err(CipherError::InvalidKeyLength { actual: 15, .. })
    ));
    assert!(matches!(
        des_encrypt(b"x", &[0u8; 16], Mode::Ecb, None),
        Err(CipherError::InvalidKeyLength { actual: 16, .. })
    ));
    assert_eq!(
        aes_encrypt(b"x", &[0u8; 16], Mode::Cbc, Some(&[0u8; 8])),
        Err(CipherError::InvalidIv { expected: 16, actual: 8 })
    );
    assert_eq!(
        aes_decrypt(&[], &[0u8; 16], Mode::Ecb, None),
        Err(CipherError::InvalidCiphertextLength { block_size: 16, actual: 0 })
    );
}

#[test]
fn des_ignores_parity_bits() {
    let a = Des::new(&hex("133457799bbcdff1")).unwrap();
    let b = Des::new(&hex("123556789abddef0")).unwrap();
    let mut x = [0x42u8; 8];
    let mut y = [0x42u8; 8];
    a.encrypt_block(&mut x).unwrap();
    b.encrypt_block(&mut y).unwrap();
    assert_eq!(x, y);
}
