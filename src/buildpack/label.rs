//! Human-readable label for a buildpack plus its decorators
//!
//! The label is what ends up as `detected_buildpack` in the staging info, and
//! the platform truncates anything at or beyond 255 characters.

const MAX_LABEL_CHARS: usize = 255;
const MAX_INFO_CHARS: usize = 128;
const ELLIPSIS: &str = "...";

/// Describes a buildpack selection, e.g. `ruby (with decorator newrelic)`
pub fn describe_selection(buildpack: &str, decorators: &[String]) -> String {
    let buildpack = buildpack.trim_end_matches('\n');

    let info = match decorators {
        [] => "(no decorators apply)".to_string(),
        [single] => format!("(with decorator {})", single),
        many => {
            let info = format!("(with decorators {})", many.join(", "));
            if info.chars().count() > MAX_INFO_CHARS {
                "(with decorators)".to_string()
            } else {
                info
            }
        }
    };

    let info_len = info.chars().count();
    if buildpack.chars().count() + info_len >= MAX_LABEL_CHARS {
        let keep = (MAX_LABEL_CHARS - 4).saturating_sub(info_len);
        let truncated: String = buildpack.chars().take(keep).collect();
        format!("{}{} {}", truncated, ELLIPSIS, info)
    } else {
        format!("{} {}", buildpack, info)
    }
}
