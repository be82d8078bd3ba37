use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::io::{self, Write};

use rsa_stego::pipeline::{decode_encrypted, encode_encrypted};
use rsa_stego::rsa::{generate_keypair, PrivateKey};

#[derive(Parser, Debug)]
#[command(author, version, about = "RSA steganography tool", long_about = None)]
struct Args {
    /// Default output path for encoded images
    #[arg(short, long, default_value = "output.png")]
    output: String,
}

fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .init();
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_u64(label: &str) -> anyhow::Result<u64> {
    Ok(prompt(label)?.parse()?)
}

fn generate_keys() -> anyhow::Result<()> {
    let pair = generate_keypair()?;
    println!(
        "Public Key (e, n): ({}, {})",
        pair.public.exponent, pair.public.modulus
    );
    println!(
        "Private Key (d, n): ({}, {})",
        pair.private.exponent, pair.private.modulus
    );
    Ok(())
}

fn encode(default_output: &str) -> anyhow::Result<()> {
    let input_path = prompt("Enter input image path: ")?;
    let message = prompt("Enter message to hide: ")?;
    let output_path = prompt(&format!("Enter output image path [{}]: ", default_output))?;
    let output_path = if output_path.is_empty() {
        default_output.to_string()
    } else {
        output_path
    };

    let pair = generate_keypair()?;
    let image = image::open(&input_path)?.to_rgb8();
    let stego = encode_encrypted(&image, &message, &pair.public)?;
    stego.save(&output_path)?;

    println!("Encrypted message encoded in {}", output_path);
    println!(
        "Private Key (for decryption): ({}, {})",
        pair.private.exponent, pair.private.modulus
    );
    Ok(())
}

fn decode() -> anyhow::Result<()> {
    let input_path = prompt("Enter image with hidden message: ")?;
    let d = prompt_u64("Enter private key d: ")?;
    let n = prompt_u64("Enter private key n: ")?;
    let key = PrivateKey {
        exponent: d,
        modulus: n,
    };

    let image = image::open(&input_path)?.to_rgb8();
    let message = decode_encrypted(&image, &key)?;
    println!("Decrypted Message: {}", message);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();

    loop {
        println!("\n--- RSA Steganography Tool ---");
        println!("1. Generate Keypair");
        println!("2. Encode Message");
        println!("3. Decode Message");
        println!("4. Exit");

        let choice = prompt("Enter your choice (1/2/3/4): ")?;
        let result = match choice.as_str() {
            "1" => generate_keys(),
            "2" => encode(&args.output),
            "3" => decode(),
            "4" => {
                println!("Exiting...");
                return Ok(());
            }
            _ => {
                println!("Invalid choice. Try again.");
                continue;
            }
        };

        if let Err(e) = result {
            println!("Error: {}", e);
        }
    }
}
