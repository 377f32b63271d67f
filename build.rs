use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Copy config to target directory
    copy_config();
}

/// Copies config.json next to the built executable so `load_config` finds it.
fn copy_config() {
    let Ok(out_dir) = env::var("OUT_DIR") else {
        return;
    };
    // OUT_DIR is something like target/release/build/minesweeper-bot-xxx/out
    // We need to go up to target/release (or target/debug)
    let Some(target_dir) = Path::new(&out_dir).ancestors().nth(3) else {
        return;
    };

    let config_src = Path::new("config.json");
    let config_dst = target_dir.join("config.json");

    if config_src.exists() {
        let _ = fs::copy(config_src, &config_dst);
        println!("cargo:rerun-if-changed=config.json");
    }
}
