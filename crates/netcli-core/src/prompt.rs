use crate::error::NetcliError;
use crate::platform::{PlatformProfile, PromptTrim};
use crate::prompt_reader::PromptReader;
use crate::session::strip_ansi_escape_codes;
use regex::Regex;
use tracing::debug;

// Devices truncate or colour-wrap long hostnames; matching a short prefix
// tolerates that without over-matching.
const PROMPT_PREFIX_LEN: usize = 12;

/// Alternation of the profile's escaped delimiter characters. Used to drain
/// banners, to discover the prompt and as the prompt stand-in before the
/// base pattern exists.
pub fn delimiter_pattern(profile: &PlatformProfile) -> Result<Regex, NetcliError> {
    let joined = join_escaped(profile.delimiters);
    Regex::new(&joined)
        .map_err(|e| NetcliError::UsageError(format!("invalid delimiter pattern {:?}: {}", joined, e)))
}

/// Probe the device for its current prompt: send a bare newline, read until
/// a delimiter appears and keep the last line.
pub async fn find_prompt(
    reader: &mut PromptReader,
    ansi_escape_codes: bool,
) -> Result<String, NetcliError> {
    debug!(target: "prompt::find_prompt", "Finding prompt");
    reader.send("\n").await?;
    let output = reader.read_until_delimiters(None).await?;

    let output = if ansi_escape_codes {
        strip_ansi_escape_codes(&output)
    } else {
        output
    };

    let prompt = output
        .trim()
        .lines()
        .last()
        .map(|line| line.trim().to_string())
        .unwrap_or_default();

    if prompt.is_empty() {
        return Err(NetcliError::connection(
            reader.host(),
            "unable to find prompt",
        ));
    }

    debug!(target: "prompt::find_prompt", "Found prompt: {:?}", prompt);
    Ok(prompt)
}

/// Derive the base prompt from the raw captured prompt using the platform's
/// trim strategy.
pub fn derive_base_prompt(raw_prompt: &str, trim: PromptTrim) -> String {
    match trim {
        PromptTrim::TrailingDelimiter => drop_last(raw_prompt).to_string(),
        PromptTrim::Enclosing => drop_last(drop_first(raw_prompt)).to_string(),
        PromptTrim::AfterAt => {
            let trimmed = drop_last(raw_prompt);
            match trimmed.split_once('@') {
                Some((_, after)) => after.to_string(),
                None => trimmed.to_string(),
            }
        }
        PromptTrim::ParenPrefix => {
            let head = raw_prompt.split(')').next().unwrap_or("");
            drop_first(head).to_string()
        }
        PromptTrim::ParenWrapped => {
            let mut result = drop_first(raw_prompt);
            for _ in 0..3 {
                result = drop_last(result);
            }
            result.to_string()
        }
    }
}

/// Build the base pattern: the escaped 12-character prompt prefix and the
/// escaped delimiter set substituted into the platform's template (or the
/// caller's override).
pub fn build_base_pattern(
    profile: &PlatformProfile,
    base_prompt: &str,
    template_override: Option<&str>,
) -> Result<Regex, NetcliError> {
    let prefix: String = base_prompt.chars().take(PROMPT_PREFIX_LEN).collect();
    let prompt = regex::escape(&prefix);
    let delimiters = join_escaped(profile.delimiters);
    let left_delimiters = join_escaped(profile.left_delimiters);

    let template = template_override.unwrap_or(profile.pattern_template);
    let pattern = template
        .replace("{prompt}", &prompt)
        .replace("{delimiters}", &delimiters)
        .replace("{delimiter_left}", &left_delimiters)
        .replace("{delimiter_right}", &join_escaped(profile.delimiters));

    debug!(target: "prompt::build_base_pattern", "Base pattern: {}", pattern);
    Regex::new(&pattern)
        .map_err(|e| NetcliError::UsageError(format!("invalid prompt pattern {:?}: {}", pattern, e)))
}

fn join_escaped(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join("|")
}

fn drop_first(s: &str) -> &str {
    s.char_indices().nth(1).map(|(i, _)| &s[i..]).unwrap_or("")
}

fn drop_last(s: &str) -> &str {
    s.char_indices().last().map(|(i, _)| &s[..i]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::lookup;

    #[test]
    fn trims_cover_the_vendor_prompts() {
        assert_eq!(
            derive_base_prompt("Router#", PromptTrim::TrailingDelimiter),
            "Router"
        );
        assert_eq!(derive_base_prompt("<HP>", PromptTrim::Enclosing), "HP");
        assert_eq!(derive_base_prompt("user@srx>", PromptTrim::AfterAt), "srx");
        assert_eq!(derive_base_prompt("srx%", PromptTrim::AfterAt), "srx");
        assert_eq!(
            derive_base_prompt("(WLC-7220) [mynode] #", PromptTrim::ParenPrefix),
            "WLC-7220"
        );
        assert_eq!(
            derive_base_prompt("(switch) >", PromptTrim::ParenWrapped),
            "switch"
        );
    }

    #[test]
    fn long_hostnames_match_on_a_twelve_char_prefix() {
        let profile = lookup("cisco_ios").unwrap();
        let base_prompt = derive_base_prompt("VeryLongHostnameXY#", profile.prompt_trim);
        assert_eq!(base_prompt, "VeryLongHostnameXY");

        let pattern = build_base_pattern(profile, &base_prompt, None).unwrap();
        assert!(pattern.as_str().starts_with("VeryLongHost"));
        assert!(pattern.is_match("VeryLongHostnameXY(config)#"));
        assert!(pattern.is_match("VeryLongHostnameXY>"));
        assert!(!pattern.is_match("OtherRouter#"));
    }

    #[test]
    fn comware_pattern_matches_both_views() {
        let profile = lookup("hp_comware").unwrap();
        let pattern = build_base_pattern(profile, "HP", None).unwrap();
        assert!(pattern.is_match("<HP>"));
        assert!(pattern.is_match("[HP]"));
        assert!(pattern.is_match("[HP-vlan10]"));
        assert!(!pattern.is_match("HP#"));
    }

    #[test]
    fn junos_pattern_matches_all_shells() {
        let profile = lookup("juniper_junos").unwrap();
        let pattern = build_base_pattern(profile, "srx", None).unwrap();
        assert!(pattern.is_match("admin@srx> "));
        assert!(pattern.is_match("admin@srx# "));
        assert!(pattern.is_match("admin@srx% "));
    }

    #[test]
    fn template_override_wins() {
        let profile = lookup("cisco_ios").unwrap();
        let pattern = build_base_pattern(profile, "Router", Some(r"{prompt}\$")).unwrap();
        assert!(pattern.is_match("Router$"));
        assert!(!pattern.is_match("Router#"));
    }
}
