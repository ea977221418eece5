//! # Validation Report Module / 验证报告模块
//!
//! The validation firmware prints an XML test report to the model's console.
//! This module crops that report out of the captured output, parses it and
//! converts it into a JUnit XML document that CI systems understand.
//!
//! 验证固件会将 XML 测试报告打印到模型的控制台。
//! 此模块从捕获的输出中裁剪出该报告，解析它，并将其转换为 CI 系统可识别的 JUnit XML 文档。

use once_cell::sync::Lazy;
use quick_xml::escape::escape;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

static REPORT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<\?xml version="1.0"\?>"#).expect("report start pattern is valid")
});
static REPORT_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</report>").expect("report end pattern is valid"));

/// Errors raised while extracting or writing a test report.
/// 提取或写入测试报告时产生的错误。
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The output contains no `<?xml version="1.0"?> ... </report>` fragment.
    #[error("no test report found in output")]
    NotFound,

    /// The fragment is not a well-formed validation report.
    #[error("malformed test report: {0}")]
    Syntax(#[from] quick_xml::DeError),

    /// The JUnit file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// `true` when the output simply carried no usable report. Callers treat
    /// this as a warning rather than a failure.
    pub fn is_missing_report(&self) -> bool {
        matches!(self, ReportError::NotFound | ReportError::Syntax(_))
    }
}

/// Returns the first `<?xml version="1.0"?>` ... `</report>` fragment of `output`.
/// 返回 `output` 中第一个 `<?xml version="1.0"?>` ... `</report>` 片段。
pub fn crop(output: &str) -> Result<&str, ReportError> {
    let start = REPORT_START.find(output).ok_or(ReportError::NotFound)?;
    let end = REPORT_END
        .find_at(output, start.end())
        .ok_or(ReportError::NotFound)?;
    Ok(&output[start.start()..end.end()])
}

/// Root `<report>` element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationReport {
    pub test: TestRun,
}

/// The `<test>` element: header, test cases and summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestRun {
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub file: String,
    pub test_cases: TestCases,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCases {
    #[serde(rename = "tc", default)]
    pub cases: Vec<TestCase>,
}

/// A single `<tc>` element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCase {
    pub no: u32,
    pub func: String,
    #[serde(default)]
    pub dbgi: DebugInfo,
    pub res: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DebugInfo {
    #[serde(rename = "detail", default)]
    pub details: Vec<Detail>,
}

/// Location and description of a failed or warned assertion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Detail {
    #[serde(default)]
    pub desc: Option<String>,
    pub module: String,
    pub line: u32,
}

impl Detail {
    fn render(&self) -> String {
        match &self.desc {
            Some(desc) => format!("{} ({}): {}", self.module, self.line, desc),
            None => format!("{} ({})", self.module, self.line),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Summary {
    pub tcnt: u32,
    pub exec: u32,
    pub pass: u32,
    pub fail: u32,
    pub warn: u32,
    pub tres: String,
}

/// Verdict of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Warning,
    Failed,
    NotExecuted,
}

impl TestCase {
    pub fn verdict(&self) -> Verdict {
        match self.res.trim() {
            "PASSED" => Verdict::Passed,
            "WARNING" => Verdict::Warning,
            "NOT EXECUTED" => Verdict::NotExecuted,
            _ => Verdict::Failed,
        }
    }
}

impl ValidationReport {
    /// Parses a cropped report fragment.
    pub fn parse(xml: &str) -> Result<Self, ReportError> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    /// Crops and parses the report embedded in a command's output.
    pub fn from_output(output: &str) -> Result<Self, ReportError> {
        Self::parse(crop(output)?)
    }

    /// Renders the report as a JUnit document. `suite_name` becomes the name of
    /// the single test suite and the class name of its test cases.
    ///
    /// 将报告渲染为 JUnit 文档。`suite_name` 成为唯一测试套件的名称及其测试用例的类名。
    pub fn to_junit(&self, suite_name: &str) -> String {
        let cases = &self.test.test_cases.cases;
        let count = |v: Verdict| cases.iter().filter(|c| c.verdict() == v).count();
        let suite_name = escape(suite_name);

        let failures = count(Verdict::Failed);
        let skipped = count(Verdict::NotExecuted);

        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{failures}\" skipped=\"{skipped}\">\n",
            cases.len()
        ));
        xml.push_str(&format!(
            "  <testsuite name=\"{suite_name}\" tests=\"{}\" failures=\"{failures}\" \
             skipped=\"{skipped}\" timestamp=\"{} {}\">\n",
            cases.len(),
            escape(self.test.date.trim()),
            escape(self.test.time.trim())
        ));

        for case in cases {
            let details = case
                .dbgi
                .details
                .iter()
                .map(Detail::render)
                .collect::<Vec<_>>()
                .join("\n");
            xml.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"{suite_name}\"",
                escape(case.func.trim())
            ));
            match case.verdict() {
                Verdict::Passed => xml.push_str("/>\n"),
                Verdict::NotExecuted => xml.push_str(">\n      <skipped/>\n    </testcase>\n"),
                Verdict::Warning => xml.push_str(&format!(
                    ">\n      <system-out>{}</system-out>\n    </testcase>\n",
                    escape(&details)
                )),
                Verdict::Failed => xml.push_str(&format!(
                    ">\n      <failure message=\"{}\">{}</failure>\n    </testcase>\n",
                    escape(case.res.trim()),
                    escape(&details)
                )),
            }
        }

        xml.push_str("  </testsuite>\n</testsuites>\n");
        xml
    }

    /// Writes the JUnit rendering of the report to `path`.
    pub fn write_junit(&self, path: &Path, suite_name: &str) -> Result<(), ReportError> {
        fs::write(path, self.to_junit(suite_name)).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
