use globcat::output::{OutputFormat, Presentation, WriterSink, render_records};
use globcat::roots::expand_roots;
use globcat::{Encoding, FileRecord, GlobcatBuilder, GlobcatError, globcat, run};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};
fn many_files() -> TempDir {
    let dir = tempdir().unwrap();
    for d in 0..5 {
        let sub = dir.path().join(format!("dir{d}"));
        fs::create_dir(&sub).unwrap();
        for f in 0..12 {
            fs::write(sub.join(format!("f{f}.txt")), format!("file {d}/{f}\n").repeat(40)).unwrap();
        }
        fs::write(sub.join("blob.bin"), [0u8, 159, 146, 150]).unwrap();
    }
    dir
}
fn sorted_relatives(files: &[FileRecord]) -> Vec<String> {
    let mut out: Vec<String> = files.iter().map(|f| f.relative.clone()).collect();
    out.sort();
    out
}
#[test]
fn integration_parallel_matches_sequential_set() {
    let dir = many_files();
    let sequential = globcat(GlobcatBuilder::new(dir.path()).build()).unwrap();
    let parallel = globcat(
        GlobcatBuilder::new(dir.path())
            .parallel(true)
            .workers(Some(4))
            .build(),
    )
    .unwrap();
    assert_eq!(sequential.files.len(), 60);
    assert_eq!(
        sorted_relatives(&sequential.files),
        sorted_relatives(&parallel.files)
    );
    assert_eq!(sequential.stats, parallel.stats);
    for file in &parallel.files {
        let original = fs::read(&file.path).unwrap();
        assert_eq!(file.content.as_deref(), Some(original.as_slice()));
    }
}
#[test]
fn integration_parallel_records_are_written_whole() {
    let dir = many_files();
    let options = GlobcatBuilder::new(dir.path())
        .parallel(true)
        .workers(Some(8))
        .build();
    let presentation = Presentation {
        format: OutputFormat::Json,
        ..Presentation::default()
    };
    let sink = WriterSink::new(Vec::new(), presentation);
    let stats = run(&options, &sink).unwrap();
    let out = String::from_utf8(sink.finish().unwrap()).unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), stats.files_emitted);
    assert_eq!(lines.len(), 60);
    for line in lines {
        assert_eq!(line["encoding"], "ASCII");
        assert!(line["content"].as_str().unwrap().starts_with("file "));
    }
}
#[test]
fn integration_output_formats() {
    let record = FileRecord {
        path: PathBuf::from("src/lib.rs"),
        relative: "src/lib.rs".into(),
        encoding: Some(Encoding::Ascii),
        content: Some(b"pub fn f() {}\n\n  ".to_vec()),
    };
    let template = Presentation {
        template: "== %s (100%%) ==\n%s|%s\n".into(),
        ..Presentation::default()
    };
    assert_eq!(
        String::from_utf8(template.render(&record)).unwrap(),
        "== src/lib.rs (100%) ==\npub fn f() {}|\n"
    );
    let untrimmed = Presentation {
        trim_file_ending: false,
        ..Presentation::default()
    };
    assert_eq!(
        String::from_utf8(untrimmed.render(&record)).unwrap(),
        "src/lib.rs\n---\npub fn f() {}\n\n  \n---\n\n"
    );
    let markdown = Presentation {
        format: OutputFormat::Markdown,
        ..Presentation::default()
    };
    assert_eq!(
        String::from_utf8(markdown.render(&record)).unwrap(),
        "## src/lib.rs\n\n```rust\npub fn f() {}\n```\n\n"
    );
    let listed = FileRecord {
        content: None,
        ..record
    };
    assert_eq!(
        render_records(&[listed.clone(), listed.clone()], &Presentation::default()),
        b"src/lib.rs\nsrc/lib.rs\n"
    );
    let json = Presentation {
        format: OutputFormat::Json,
        ..Presentation::default()
    };
    assert_eq!(
        String::from_utf8(json.render(&listed)).unwrap(),
        "{\"path\":\"src/lib.rs\",\"relative\":\"src/lib.rs\",\"encoding\":\"ASCII\"}\n"
    );
}
#[test]
fn integration_trim_keeps_tabs_and_carriage_returns() {
    let presentation = Presentation {
        template: "%s:[%s]".into(),
        ..Presentation::default()
    };
    let render = |content: &[u8]| {
        let record = FileRecord {
            path: PathBuf::from("notes.txt"),
            relative: "notes.txt".into(),
            encoding: Some(Encoding::Ascii),
            content: Some(content.to_vec()),
        };
        String::from_utf8(presentation.render(&record)).unwrap()
    };
    assert_eq!(render(&b"a\n \n  "[..]), "notes.txt:[a]");
    assert_eq!(render(&b"a\t\n"[..]), "notes.txt:[a\t]");
    assert_eq!(render(&b"a\r\n"[..]), "notes.txt:[a\r]");
    assert_eq!(render(&b"a \t"[..]), "notes.txt:[a \t]");
    assert_eq!(render(&b"\n\n "[..]), "notes.txt:[]");
}
#[test]
fn integration_markdown_fence_tags() {
    let markdown = Presentation {
        format: OutputFormat::Markdown,
        ..Presentation::default()
    };
    let fence = |path: &str| {
        let record = FileRecord {
            path: PathBuf::from(path),
            relative: path.into(),
            encoding: Some(Encoding::Ascii),
            content: Some(b"x".to_vec()),
        };
        let out = String::from_utf8(markdown.render(&record)).unwrap();
        out.lines().nth(2).unwrap_or_default().to_string()
    };
    assert_eq!(fence("main.go"), "```go");
    assert_eq!(fence("lib/util.hpp"), "```cpp");
    assert_eq!(fence("config.yml"), "```yaml");
    assert_eq!(fence("Makefile"), "```");
    assert_eq!(fence("archive.tar.zst"), "```");
}
#[test]
fn integration_expand_roots() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();
    fs::write(dir.path().join("c.rs"), "c").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/d.txt"), "d").unwrap();
    let base = dir.path().display().to_string();
    let expansion = expand_roots(&[
        format!("{base}/*.txt"),
        format!("{base}/sub"),
        format!("{base}/missing"),
        format!("{base}/*.none"),
        format!("{base}/[ab"),
    ]);
    assert_eq!(
        expansion.roots,
        [
            dir.path().join("a.txt"),
            dir.path().join("b.txt"),
            dir.path().join("sub"),
        ]
    );
    assert_eq!(expansion.errors.len(), 3);
    assert!(matches!(&expansion.errors[0], GlobcatError::NoMatch(arg) if arg.ends_with("/missing")));
    assert!(matches!(&expansion.errors[1], GlobcatError::NoMatch(arg) if arg.ends_with("/*.none")));
    assert!(matches!(&expansion.errors[2], GlobcatError::InvalidGlob { .. }));
    let nested = expand_roots(&[format!("{base}/*/*.txt")]);
    assert_eq!(nested.roots, [dir.path().join("sub/d.txt")]);
    fs::write(dir.path().join("{a,b}.txt"), "literal").unwrap();
    let braces = expand_roots(&[format!("{base}/{{a,b}}.txt")]);
    assert_eq!(braces.roots, [dir.path().join("{a,b}.txt")]);
    assert!(braces.errors.is_empty());
    let none: [&str; 0] = [];
    assert_eq!(expand_roots(&none).roots, [PathBuf::from(".")]);
}
fn cli_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    fs::write(dir.path().join("b.bin"), [0u8, 1, 2, 3]).unwrap();
    fs::create_dir(dir.path().join("vendor")).unwrap();
    fs::write(dir.path().join("vendor/c.txt"), "vendored\n").unwrap();
    dir
}
fn globcat_cli(dir: &Path, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_globcat"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}
#[test]
fn integration_cli_prints_selected_text_files() {
    let dir = cli_fixture();
    let out = globcat_cli(dir.path(), &["-i", "*.txt", "-e", "vendor/"]);
    assert_eq!(out, "a.txt\n---\nhello\n---\n\n");
}
#[test]
fn integration_cli_lists_text_files() {
    let dir = cli_fixture();
    assert_eq!(globcat_cli(dir.path(), &["--list"]), "a.txt\nvendor/c.txt\n");
    assert_eq!(
        globcat_cli(dir.path(), &["--list", "--text", "false"]),
        "a.txt\nb.bin\nvendor/c.txt\n"
    );
}
#[test]
fn integration_cli_glob_argument() {
    let dir = cli_fixture();
    let out = globcat_cli(dir.path(), &["-o", "%s;", "*.txt", "vendor"]);
    assert_eq!(out, "a.txt;vendor/c.txt;");
}
