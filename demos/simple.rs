use speck_simon::{Cipher, Native, VariantConfig};

fn main() {
    println!("🔐 Speck / Simon Block Cipher Example");
    println!("=====================================");

    // Key words k0..k3 = 0x03020100, 0x0b0a0908, 0x13121110, 0x1b1a1918
    let key = [
        0x00, 0x01, 0x02, 0x03, 0x08, 0x09, 0x0a, 0x0b, 0x10, 0x11, 0x12, 0x13, 0x18, 0x19, 0x1a,
        0x1b,
    ];

    // Example 1: Speck 64/128 on a byte block
    println!("📝 Example 1: Speck 64/128");
    println!("--------------------------");

    let speck = Cipher::from_name("speck64/128", &key).expect("valid variant and key");
    let config = speck.config();
    println!("📊 Block size: {} bits", config.block_bits());
    println!("🔧 Key size: {} bits", config.key_bits());
    println!("🔄 Rounds: {}", config.rounds());

    let message = *b"-Cutter;";
    let mut block = message;
    println!("📥 Plaintext:  {:02x?}", block);

    speck.encrypt_block(&mut block).expect("block is 8 bytes");
    println!("🔒 Ciphertext: {:02x?}", block);

    speck.decrypt_block(&mut block).expect("block is 8 bytes");
    println!("🔓 Decrypted:  {:02x?}", block);
    println!("✅ Success: {}", block == message);
    println!();

    // Example 2: Simon 64/128 with the (x, y) word API
    println!("📝 Example 2: Simon 64/128");
    println!("--------------------------");

    let simon = Cipher::from_name("simon64/128", &key).expect("valid variant and key");
    let plaintext = [0x656b_696c, 0x2064_6e75];
    let ciphertext = simon.encrypt_words(plaintext).expect("word API");
    println!("📥 Plaintext:  {:08x} {:08x}", plaintext[0], plaintext[1]);
    println!("🔒 Ciphertext: {:08x} {:08x}", ciphertext[0], ciphertext[1]);
    println!("✅ Matches published vector: {}", ciphertext == [0x44c8_fc20, 0xb9df_a07a]);
    println!();

    // Example 3: the same variant on the word-native backend
    println!("📝 Example 3: Native backend");
    println!("----------------------------");

    let cfg = VariantConfig::by_name("simon64/128").expect("known variant");
    let native = Cipher::with_backend(cfg, &key, &Native).expect("32-bit words are native");
    let again = native.encrypt_words(plaintext).expect("word API");
    println!("🔒 Ciphertext: {:08x} {:08x}", again[0], again[1]);
    println!("✅ Backends agree: {}", again == ciphertext);
    println!();

    // Example 4: every variant round-trips a random key
    println!("📝 Example 4: All variants");
    println!("--------------------------");

    for cfg in VariantConfig::all() {
        let cipher = Cipher::new(cfg, &cfg.random_key()).expect("key sized from config");
        let ct = cipher.encrypt_words([1, 2]).expect("word API");
        let recovered = cipher.decrypt_words(ct).expect("word API");
        println!("{:<14} -> {:x?} -> {:x?} ✅", cfg.name(), ct, recovered);
        assert_eq!(recovered, [1, 2]);
    }

    println!();
    println!("🎉 All examples completed successfully!");
}
