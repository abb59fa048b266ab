#![cfg(test)]

//! This module runs test cases defined in `data/test/cases`.
//!
//! Each test case consists of two files, named in terms of `<name>`, the name of the test case:
//! * `<name>.args`: the command line arguments, one per line
//! * `<name>.out`: lines the output must contain, in order
//!
//! An expected line matches any output line which contains it, so cases can ignore column padding
//! and unrelated lines. Every case runs against the saved responses in `data/test/fixtures`, with
//! times in UTC and without colors, so the output does not depend on the machine running the tests.
//! Lines starting with `#` in either file are ignored, except for a `# exit <status>` line in the
//! `.out` file, which gives the exit status the case must end with (0 if there is none).

use super::Options;
use ansi_term::Color;
use anyhow::Error;
use clap::Parser;
use futures::future::join_all;
use std::ffi::OsString;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

#[async_std::test]
async fn cli_test_cases() -> Result<(), Error> {
    flightdata::init_logging();

    // Discover test cases.
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap();
    let fixtures = workspace.join("data/test/fixtures");
    let test_cases = workspace
        .join("data/test/cases")
        .read_dir()?
        .filter_map(|dirent| {
            let path = dirent.unwrap().path();
            if path.extension()?.to_str().unwrap() == "args" {
                Some(TestCase::new(&path).unwrap())
            } else {
                None
            }
        })
        .collect::<Vec<_>>();
    assert!(!test_cases.is_empty(), "no test cases found");

    let results = join_all(test_cases.into_iter().map(|test| test.run(&fixtures))).await;
    for result in &results {
        println!("{}", result);
    }
    if results.iter().any(TestResult::failed) {
        Err(Error::msg(format!("{}", Color::Red.paint("tests failed"))))
    } else {
        println!("All test cases passed.");
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct TestCase {
    name: OsString,
    args: Vec<String>,
    expected: Vec<String>,
    status: i32,
}

impl TestCase {
    fn new(args_path: impl AsRef<Path>) -> Result<Self, Error> {
        let args_path = args_path.as_ref();
        let name = args_path.file_stem().unwrap();
        let out_path = args_path.with_extension("out");
        Ok(Self {
            name: name.into(),
            args: lines(args_path)?,
            expected: lines(&out_path)?,
            status: exit_status(&out_path)?,
        })
    }

    async fn run(self, fixtures: &Path) -> TestResult {
        TestResult {
            name: self.name,
            failure: Self::do_test(self.args, self.expected, self.status, fixtures.to_path_buf())
                .await
                .err(),
        }
    }

    async fn do_test(
        args: Vec<String>,
        expected: Vec<String>,
        status: i32,
        fixtures: PathBuf,
    ) -> Result<(), Error> {
        let fixtures = fixtures
            .to_str()
            .ok_or_else(|| Error::msg("fixture path is not UTF-8"))?;
        let opt = Options::try_parse_from(
            ["arrivals"]
                .into_iter()
                .chain(args.iter().map(String::as_str))
                .chain(["--data-dir", fixtures, "--utc", "--no-color"]),
        )?;

        let mut out = vec![];
        let found = opt.run(&mut out).await?;
        let output = String::from_utf8(out)?;
        let actual_status = if found { 0 } else { 1 };
        if actual_status != status {
            return Err(Error::msg(format!(
                "expected exit status {status}, got {actual_status}\nactual output:\n{output}"
            )));
        }

        let mut actual = output.lines();
        for line in &expected {
            if !actual.any(|actual| actual.contains(line.as_str())) {
                return Err(Error::msg(format!(
                    "expected output line:\n{line}\nactual output:\n{output}"
                )));
            }
        }
        Ok(())
    }
}

/// The meaningful lines of a test case file.
fn lines(path: &Path) -> Result<Vec<String>, Error> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// The exit status named by a `# exit <status>` line, or 0.
fn exit_status(path: &Path) -> Result<i32, Error> {
    for line in fs::read_to_string(path)?.lines() {
        if let Some(status) = line.trim().strip_prefix("# exit") {
            return Ok(status.trim().parse()?);
        }
    }
    Ok(0)
}

struct TestResult {
    name: OsString,
    failure: Option<anyhow::Error>,
}

impl TestResult {
    fn failed(&self) -> bool {
        self.failure.is_some()
    }
}

impl Display for TestResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}...", self.name.to_string_lossy())?;
        if let Some(err) = &self.failure {
            writeln!(f, "{}", Color::Red.paint("FAILED"))?;
            write!(f, "{err}")?;
        } else {
            write!(f, "{}", Color::Green.paint("OK"))?;
        }
        Ok(())
    }
}
