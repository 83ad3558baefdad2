use std::path::PathBuf;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_r16-asm"))
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("r16-asm-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn assembles_file_to_hex_lines() {
    let input = scratch("ok.asm");
    let output = scratch("ok.hex");
    std::fs::write(&input, "add r1 r2 r3\nbrr 0\n").unwrap();

    let st = bin().arg(&input).arg(&output).status().unwrap();
    assert_eq!(st.code(), Some(0));

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 512);
    assert_eq!(&lines[..3], ["0253", "8000", "0000"]);
}

#[test]
fn wrong_argument_count_is_usage_error() {
    let out = bin().arg("only-one").output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("usage"));

    let out = bin().args(["a", "b", "c"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));

    for flag in ["--help", "--version", "-h"] {
        let out = bin().arg(flag).output().unwrap();
        assert_eq!(out.status.code(), Some(1), "{flag}");
        assert!(String::from_utf8_lossy(&out.stdout).contains("usage"), "{flag}");
    }
}

#[test]
fn assembly_error_leaves_output_untouched() {
    let input = scratch("bad.asm");
    let output = scratch("bad.hex");
    std::fs::write(&input, "nop\nadd r1 r2\n").unwrap();
    let _ = std::fs::remove_file(&output);

    let out = bin().arg(&input).arg(&output).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Line 2"), "{stdout}");
    assert!(!output.exists());
}
