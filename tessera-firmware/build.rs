//! Build script for tessera-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates compositor.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolution limits of the supported panels
const MAX_WIDTH: i64 = 128;
const MAX_HEIGHT: i64 = 64;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate compositor.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=compositor.toml");

    let config_path = Path::new("compositor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: compositor.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds compositor.toml at build time.              ║\n\
            ║  Please create one in the tessera-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read compositor.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in compositor.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_compositor(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: compositor.toml validation failed                        ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&errors.join("\n"))
        );
    }

    println!("cargo:warning=compositor.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[display]`: width and height within panel limits
fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };

    for (key, max) in [("width", MAX_WIDTH), ("height", MAX_HEIGHT)] {
        match display.get(key) {
            None => {}
            Some(toml::Value::Integer(v)) if (1..=max).contains(v) => {}
            Some(toml::Value::Integer(v)) => {
                errors.push(format!("display.{}: {} is outside 1..={}", key, v, max));
            }
            Some(_) => errors.push(format!("display.{}: expected an integer", key)),
        }
    }
}

/// `[compositor]`: animation step, render period and FPS flag
fn validate_compositor(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(compositor) = config.get("compositor") else {
        return;
    };

    match compositor.get("animation_step") {
        None => {}
        Some(toml::Value::Float(step)) if *step > 0.0 && *step <= 1.0 => {}
        Some(toml::Value::Float(step)) => {
            errors.push(format!("compositor.animation_step: {} is outside (0, 1]", step));
        }
        Some(_) => errors.push("compositor.animation_step: expected a float".to_string()),
    }

    match compositor.get("render_period_ms") {
        None => {}
        Some(toml::Value::Integer(ms)) if *ms > 0 => {}
        Some(toml::Value::Integer(ms)) => {
            errors.push(format!("compositor.render_period_ms: {} must be positive", ms));
        }
        Some(_) => errors.push("compositor.render_period_ms: expected an integer".to_string()),
    }

    match compositor.get("show_fps") {
        None | Some(toml::Value::Boolean(_)) => {}
        Some(_) => errors.push("compositor.show_fps: expected true or false".to_string()),
    }
}
