//! Session path resolution helpers shared by the shell and explorer views.

/// Resolves shell input against `cwd` into an absolute segment list.
///
/// Input starting with `/` resolves from the root; anything else is joined onto `cwd`. `..` pops
/// one segment when there is one to pop, `.` and empty segments are skipped, and backslashes are
/// read as `/`. The returned segments are not checked against any tree.
pub fn resolve_session_path<S: AsRef<str>>(cwd: &[S], input: &str) -> Vec<String> {
    let normalized = input.trim().replace('\\', "/");
    let mut out = if normalized.starts_with('/') {
        Vec::new()
    } else {
        cwd.iter().map(|segment| segment.as_ref().to_string()).collect()
    };

    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            name => out.push(name.to_string()),
        }
    }
    out
}

/// Renders a segment list as `/a/b`, or `/` for the root.
pub fn display_path<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().fold(String::new(), |mut out, segment| {
        out.push('/');
        out.push_str(segment.as_ref());
        out
    })
}

/// Splits a display path such as `/home/admin` into segments.
pub fn parse_absolute_path(path: &str) -> Vec<String> {
    resolve_session_path::<&str>(&[], path)
}
