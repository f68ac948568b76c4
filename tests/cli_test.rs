use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::process::{Command,Stdio}; // Run programs
use std::path::Path;
use std::fs::File;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn verify_passing() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("verify")
        .write_stdin("10 TEXT\n20 PRINT \"HELLO\"\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Passing"))
        .stdout(predicate::str::contains("20 PRINT \"HELLO\""));
    Ok(())
}

#[test]
fn verify_missing_line() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("verify")
        .write_stdin("10 GOTO 20\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line does not exist"))
        .stderr(predicate::str::contains("errors"));
    Ok(())
}

#[test]
fn verify_with_config() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("verify")
        .arg("--config").arg("{\"flag\": {\"badReferences\": \"ignore\"}}")
        .write_stdin("10 GOTO 20\n")
        .assert()
        .success();
    Ok(())
}

#[test]
fn verify_bad_config() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("verify")
        .arg("--config").arg("{\"flag\": ")
        .write_stdin("10 END\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn verify_file() -> TestResult {
    let mut cmd = Command::cargo_bin("integerbasic")?;
    let fd = File::open(Path::new("tests").join("integerbasic").join("test-lines.ibas"))?;
    cmd.arg("verify")
        .stdin(Stdio::from(fd))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line number out of order"));
    Ok(())
}

#[test]
fn tokenize_to_pipe() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    let output = cmd.arg("tokenize")
        .write_stdin("10 TEXT\r\n20 PRINT \"HELLO\"\n")
        .output()?;
    assert!(output.status.success());
    assert_eq!(output.stdout,hex::decode("050A004B010C14006128C8C5CCCCCF2901")?);
    Ok(())
}

#[test]
fn tokenize_syntax_error() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("tok")
        .write_stdin("10 PRINT \"HI\" 5\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn detokenize_from_pipe() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("detokenize")
        .write_stdin(hex::decode("050A004B010C14006128C8C5CCCCCF2901")?)
        .assert()
        .success()
        .stdout(predicate::eq("10 TEXT \n20 PRINT \"HELLO\"\n"));
    Ok(())
}

#[test]
fn detokenize_nothing() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("dtok")
        .write_stdin(Vec::<u8>::new())
        .assert()
        .failure();
    Ok(())
}

#[test]
fn renumber_all() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("renumber")
        .arg("-f").arg("100")
        .arg("-s").arg("10")
        .write_stdin("10 GOTO 20\n20 END\n")
        .assert()
        .success()
        .stdout(predicate::eq("100 GOTO 110\n110 END\n"));
    Ok(())
}

#[test]
fn renumber_zero_step() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("renumber")
        .arg("-s").arg("0")
        .write_stdin("10 GOTO 20\n20 END\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn renumber_bad_extern() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("renumber")
        .arg("--extern").arg("10,x")
        .write_stdin("10 GOTO 20\n20 END\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn renumber_keeps_extern() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("renumber")
        .arg("-f").arg("10")
        .arg("-s").arg("5")
        .arg("--extern").arg("20")
        .write_stdin("10 GOTO 20\n20 END\n30 END\n")
        .assert()
        .success()
        .stdout(predicate::eq("10 GOTO 20\n20 END\n25 END\n"));
    Ok(())
}

#[test]
fn renumber_moves_extern() -> TestResult {
    let mut cmd = assert_cmd::Command::cargo_bin("integerbasic")?;
    cmd.arg("renumber")
        .arg("-f").arg("100")
        .arg("--extern").arg("10")
        .write_stdin("10 GOTO 20\n20 END\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn token_table() -> TestResult {
    let mut cmd = Command::cargo_bin("integerbasic")?;
    cmd.arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("{\"code\":75,\"lexeme\":\"TEXT\",\"rule id\":\"statement_text\"}"));
    Ok(())
}

#[test]
fn completions() -> TestResult {
    let mut cmd = Command::cargo_bin("integerbasic")?;
    cmd.arg("completions")
        .arg("-s").arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("integerbasic"));
    Ok(())
}
