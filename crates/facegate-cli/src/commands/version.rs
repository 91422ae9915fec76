//! Version command implementation.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() {
    println!("facegate {VERSION}");
    println!();
    println!("Role-based file access gated by facial recognition.");
    println!();
    println!("Build info:");
    println!("  Identity store format: v{}", facegate_store::STORE_FORMAT_VERSION);
    println!("  Target:                {}", std::env::consts::ARCH);
    println!("  OS:                    {}", std::env::consts::OS);
}
