use once_cell::sync::Lazy;
use regex::Regex;

static ILLEGAL_PATH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("static regex"));

/// Strip characters that are illegal in folder names (`\ / : * ? " < > |`)
/// and trim surrounding whitespace. Idempotent.
pub fn sanitize_name(name: &str) -> String {
    ILLEGAL_PATH_CHARS.replace_all(name, "").trim().to_string()
}

/// True when `name` can be used as a single path component: not empty and
/// not made only of dots (`.` and `..` would escape the parent folder).
pub fn is_usable_folder_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().all(|c| c == '.')
}

/// Join segments onto a path that lives on the Lidarr host. Always uses `/`
/// since that path is not necessarily valid on this machine.
pub fn join_remote_path(base: &str, segments: &[&str]) -> String {
    let mut out = base.trim_end_matches('/').to_string();
    for seg in segments {
        out.push('/');
        out.push_str(seg.trim_matches('/'));
    }
    out
}

/// Final non-empty segment of a `/` or `\` separated path.
pub fn last_path_segment(path: &str) -> Option<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).last()
}
