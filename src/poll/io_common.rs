use std::path::Path;

/// The last component of a path, or the path itself when it has none.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_file_name() {
        assert_eq!(simplify_file_name("/tmp/polls/data.zip"), "data.zip");
        assert_eq!(simplify_file_name("data.zip"), "data.zip");
        assert_eq!(simplify_file_name("/"), "/");
    }
}
