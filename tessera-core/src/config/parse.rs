//! Minimal TOML parser for compositor configuration
//!
//! Handles only the subset needed for the compositor. It does NOT
//! support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (integer, float, boolean)
//! - `[display]` and `[compositor]` section headers
//! - Comments (# ...), including trailing comments
//!
//! Unknown keys inside a known section are ignored so that newer config
//! files keep working with older firmware.

use super::types::{CompositorConfig, ConfigError};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header, a comment nor `key = value`
    InvalidLine,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Parsed configuration failed validation
    Invalid(ConfigError),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Compositor,
}

/// Parse TOML text into a validated [`CompositorConfig`]
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<CompositorConfig, ParseError> {
    let mut config = CompositorConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate().map_err(ParseError::Invalid)?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "compositor" => Ok(Section::Compositor),
        _ => Err(ParseError::InvalidSection),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_num<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut CompositorConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Display, "width") => config.width = parse_num(value)?,
        (Section::Display, "height") => config.height = parse_num(value)?,
        (Section::Compositor, "animation_step") => config.animation_step = parse_num(value)?,
        (Section::Compositor, "render_period_ms") => config.render_period_ms = parse_num(value)?,
        (Section::Compositor, "show_fps") => config.show_fps = parse_bool(value)?,
        (Section::Root, _) => return Err(ParseError::InvalidLine),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let input = r#"
# Panel
[display]
width = 96
height = 32   # half-height panel

[compositor]
animation_step = 0.1
render_period_ms = 40
show_fps = true
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.width, 96);
        assert_eq!(config.height, 32);
        assert!((config.animation_step - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.render_period_ms, 40);
        assert!(config.show_fps);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_config("[compositor]\nshow_fps = true\n").unwrap();
        assert_eq!(config.width, 128);
        assert_eq!(config.height, 64);
        assert_eq!(config.render_period_ms, 24);
        assert!(config.show_fps);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), CompositorConfig::default());
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert_eq!(
            parse_config("[audio]\nrate = 44100\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_key_outside_section_rejected() {
        assert_eq!(parse_config("width = 10\n"), Err(ParseError::InvalidLine));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert_eq!(
            parse_config("[display]\nwidth = wide\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[compositor]\nshow_fps = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\nwidth = 70000\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_validation_applied() {
        assert_eq!(
            parse_config("[display]\nwidth = 0\n"),
            Err(ParseError::Invalid(ConfigError::ZeroResolution))
        );
        assert_eq!(
            parse_config("[compositor]\nanimation_step = 2.0\n"),
            Err(ParseError::Invalid(ConfigError::InvalidAnimationStep))
        );
    }

    #[test]
    fn test_unknown_key_ignored() {
        let config = parse_config("[display]\nrotation = 180\n").unwrap();
        assert_eq!(config, CompositorConfig::default());
    }
}
