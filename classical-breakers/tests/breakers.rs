use classical_breakers::frequency::{calc_ic, only_letters, RANDOM_IC};
use classical_breakers::{
    break_caesar, break_substitution, break_vigenere, caesar, validate_and_filter, vigenere,
    LanguageModel, SubstitutionConfig, SubstitutionKey, ENGLISH_IC,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const AUTUMN: &str = "Every autumn the village held a fair on the green beside the river. Farmers brought their \
best apples and pumpkins, the baker sold warm bread from a cart, and children ran between the stalls with sticky \
fingers. In the evening a band played old songs under a string of lanterns, and the older couples danced slowly \
while the young ones laughed and watched. Nobody remembered when the fair had started, but everyone agreed that it \
marked the real end of summer. When the last lantern was put out and the tents were folded away, the first cold \
wind always seemed to arrive from the hills, as if it had been waiting politely for the music to stop.";

const HARVEST: &str = "Every autumn the village held a fair on the green beside the river. Farmers brought their \
best apples and pumpkins, the baker sold warm bread from a cart, and children ran between the stalls with sticky \
fingers. In the evening a band played old songs under a string of lanterns, and the older couples danced slowly \
while the young ones laughed and watched.";

#[test]
fn caesar_recovers_every_key() {
    for key in 0..26u8 {
        let result = break_caesar(&caesar::shift(AUTUMN, key));
        assert_eq!(result.key, key, "wrong key for shift {}", key);
        assert_eq!(result.plaintext, AUTUMN);
        assert!(result.score.is_finite());
    }
}

#[test]
fn caesar_keeps_punctuation_and_case() {
    let ciphertext = caesar::shift(HARVEST, 19);
    let symbols = |text: &str| text.chars().filter(|c| !c.is_ascii_alphabetic()).collect::<String>();
    assert_eq!(symbols(&ciphertext), symbols(HARVEST));
    let result = break_caesar(&ciphertext);
    assert_eq!(result.plaintext, HARVEST);
}

#[test]
fn english_ic_is_near_reference() {
    let ic = calc_ic(AUTUMN);
    assert!((ic - ENGLISH_IC).abs() < 0.01, "ic = {}", ic);
}

#[test]
fn vigenere_flattens_ic() {
    let ciphertext = vigenere::encrypt(AUTUMN, "LEMON").unwrap();
    assert!(calc_ic(&ciphertext) < 0.05);
}

#[test]
fn random_letters_have_random_ic() {
    let mut rng = StdRng::seed_from_u64(7);
    let text: String = (0..4000).map(|_| (b'a' + rng.gen_range(0..26u8)) as char).collect();
    let ic = calc_ic(&text);
    assert!((ic - RANDOM_IC).abs() < 0.005, "ic = {}", ic);
}

#[test]
fn vigenere_recovers_keys() {
    for key in ["LEMON", "CRYPTO", "KEY", "SECRETKEY", "AB", "ZEBRAS"] {
        let ciphertext = vigenere::encrypt(AUTUMN, key).unwrap();
        let result = break_vigenere(&ciphertext);
        assert_eq!(result.key, key);
        assert_eq!(result.plaintext, AUTUMN);
    }
}

#[test]
fn vigenere_key_is_reported_uppercase() {
    let ciphertext = vigenere::encrypt(AUTUMN, "lemon").unwrap();
    let result = break_vigenere(&ciphertext);
    assert_eq!(result.key, "LEMON");
}

#[test]
fn vigenere_single_letter_key_is_caesar() {
    let ciphertext = vigenere::encrypt(AUTUMN, "Z").unwrap();
    assert_eq!(ciphertext, caesar::shift(AUTUMN, 25));
    let result = break_vigenere(&ciphertext);
    assert_eq!(result.key, "Z");
    assert_eq!(result.plaintext, AUTUMN);
}

#[test]
fn substitution_recovers_plaintext() {
    let key = SubstitutionKey::from_plain_alphabet("QWERTYUIOPASDFGHJKLZXCVBNM").unwrap();
    let ciphertext = key.encrypt(AUTUMN);
    let mut rng = StdRng::seed_from_u64(42);

    let result = break_substitution(
        &ciphertext,
        LanguageModel::english(),
        &SubstitutionConfig::default(),
        &mut rng,
    )
    .unwrap();

    assert_eq!(result.plaintext, AUTUMN);
    assert!(result.rounds >= 1 && result.rounds <= 80);
    let expected = LanguageModel::english().score(AUTUMN);
    assert!((result.score - expected).abs() < 1e-6);
}

#[test]
fn substitution_scores_prefix_but_decrypts_everything() {
    let key = SubstitutionKey::from_plain_alphabet("QWERTYUIOPASDFGHJKLZXCVBNM").unwrap();
    let ciphertext = key.encrypt(AUTUMN);
    let config = SubstitutionConfig::builder().sample_letters(300).build().unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    assert!(only_letters(AUTUMN).len() > 500);

    let result = break_substitution(&ciphertext, LanguageModel::english(), &config, &mut rng).unwrap();

    // Text beyond the 300th letter was never scored but is still decrypted
    assert_eq!(result.plaintext, AUTUMN);
    let cut = AUTUMN
        .char_indices()
        .filter(|(_, c)| c.is_ascii_alphabetic())
        .nth(300)
        .map(|(i, _)| i)
        .unwrap();
    assert!(result.plaintext[cut..].ends_with("for the music to stop."));
    let expected = LanguageModel::english().score(&AUTUMN[..cut]);
    assert!((result.score - expected).abs() < 1e-6);
    assert!(result.score > LanguageModel::english().score(AUTUMN));
}

#[test]
fn substitution_single_letter_uses_frequency_key() {
    let mut rng = StdRng::seed_from_u64(3);
    let config = SubstitutionConfig::default();
    let result = break_substitution("x", LanguageModel::english(), &config, &mut rng).unwrap();

    assert_eq!(result.plaintext, "e");
    assert_eq!(result.key.plain_for(23), 4);
    assert!(result.rounds <= config.consolidate);
}

#[test]
fn substitution_mapping_lines() {
    let key = SubstitutionKey::from_plain_alphabet("QWERTYUIOPASDFGHJKLZXCVBNM").unwrap();
    assert_eq!(key.cipher_line(), "CIPHER: ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    assert_eq!(key.plain_line(), "PLAIN : QWERTYUIOPASDFGHJKLZXCVBNM");
}

#[test]
fn substitution_without_letters() {
    let mut rng = StdRng::seed_from_u64(1);
    let result = break_substitution(
        "1234 -- 5678",
        LanguageModel::english(),
        &SubstitutionConfig::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(result.plaintext, "1234 -- 5678");
    assert_eq!(result.key, SubstitutionKey::identity());
    assert_eq!(result.rounds, 0);
}

#[test]
fn filtered_input_still_breaks() {
    let noisy = format!("{}\n\u{00a7} ~ {}", caesar::shift(HARVEST, 3), "#");
    let report = validate_and_filter(&noisy);
    assert!(!report.is_valid);
    assert_eq!(report.invalid_count, 4);
    assert!(!report.filtered.contains('\n'));

    let result = break_caesar(&report.filtered);
    assert_eq!(result.key, 3);
    assert!(result.plaintext.starts_with(HARVEST));
}

#[test]
fn embedded_model_prefers_english() {
    let model = LanguageModel::english();
    assert!(model.word_count() > 1000);
    let scrambled = caesar::shift(HARVEST, 9);
    assert!(model.score(HARVEST) > model.score(&scrambled));
    assert_eq!(model.score(HARVEST), model.score(HARVEST));
    assert_eq!(model.ranking()[0], only_letters("e")[0]);
}
