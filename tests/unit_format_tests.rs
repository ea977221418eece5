//! # Source Formatting Tests / 源码格式测试
//!
//! Keeps the library sources within the 100 column width used by rustfmt.
//!
//! 确保库源码保持在 rustfmt 使用的 100 列宽度之内。

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

const MAX_WIDTH: usize = 100;

#[cfg(test)]
mod width_tests {
    use super::*;

    #[test]
    fn test_source_lines_fit_max_width() {
        let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        let mut too_wide = Vec::new();

        for entry in WalkDir::new(&src).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }
            let content = fs::read_to_string(path).unwrap();
            for (no, line) in content.lines().enumerate() {
                if line.chars().count() > MAX_WIDTH {
                    too_wide.push(format!("{}:{}", path.display(), no + 1));
                }
            }
        }

        assert!(too_wide.is_empty(), "lines wider than {MAX_WIDTH}: {too_wide:?}");
    }
}
