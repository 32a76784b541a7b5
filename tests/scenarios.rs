use tree_vfs::shell::{Outcome, Shell};
use tree_vfs::{FsError, TreeFs};

/// Feeds `script` to a fresh shell and returns (status, stdout, stderr).
fn run_script(script: &str) -> (i32, String, String) {
    let mut shell = Shell::default();
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let status = shell
        .run(script.as_bytes(), &mut out, &mut err, false)
        .unwrap();
    (
        status,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_create_read_and_remove_subtree() {
    let mut shell = Shell::default();
    let mut out = Vec::new();
    for line in [
        "mkdir /x",
        "mkdir /x/y",
        "make /x/y/f hello world",
        "cat /x/y/f",
        "rm /x/y/f",
        "rmr /x",
    ] {
        assert_eq!(shell.execute(line, &mut out).unwrap(), Outcome::Continue);
    }
    assert_eq!(String::from_utf8(out).unwrap(), "hello world\n");

    let fs = shell.fs();
    assert_eq!(fs.list_names(fs.root()).unwrap(), vec![".", ".."]);
    assert_eq!(fs.reachable(), vec![fs.root()]);
    assert_eq!(fs.live_count(), 1);
}

#[test]
fn test_exit_statuses() {
    assert_eq!(run_script("exit abc\n").0, 127);
    assert_eq!(run_script("exit 3\n").0, 3);
    assert_eq!(run_script("exit\n").0, 0);
    assert_eq!(run_script("mkdir /a\nmake /a/f x\nexit 5 6\n").0, 5);
}

#[test]
fn test_end_of_input_status() {
    let (status, out, err) = run_script("# setup\n\nmkdir /a\npwd\n");
    assert_eq!(status, 0);
    assert_eq!(out, "/\n");
    assert!(err.is_empty());

    let (status, _, err) = run_script("cat /missing\n");
    assert_eq!(status, 1);
    assert_eq!(err, "ysh: /missing: path does not exist\n");
}

#[test]
fn test_listing_session() {
    let script = "\
mkdir b
make a one two three
make c
mkdir b/sub
ls
cd b
pwd
lsr /
";
    let (status, out, err) = run_script(script);
    assert_eq!(err, "");
    assert_eq!(status, 0);
    let expected = "\
/:
    1 5 .
    1 5 ..
    3 3 a
    2 3 b/
    4 0 c
/b
/:
    1 5 .
    1 5 ..
    3 3 a
    2 3 b/
    4 0 c
/b:
    1 5 .
    1 5 ..
    5 2 sub/
/b/sub:
    1 5 .
    2 3 ..
";
    assert_eq!(out, expected);
}

#[test]
fn test_relative_paths_follow_cwd() {
    let script = "\
mkdir a
mkdir a/b
cd a
make b/f inside
cd b
cat f
cat /a/b/f
cat ../b/f
cd ..
pwd
";
    let (status, out, err) = run_script(script);
    assert_eq!(err, "");
    assert_eq!(status, 0);
    assert_eq!(out, "inside\ninside\ninside\n/a\n");
}

#[test]
fn test_error_messages() {
    let script = "\
mkdir
mkdir /d /e
rm
mkdir /d
make /d/f x
rm /d
cat /d
cd /d/f
frob
make /nope/f
";
    let (status, out, err) = run_script(script);
    assert_eq!(status, 1);
    assert_eq!(out, "");
    let expected = "\
ysh: mkdir: too few operands
ysh: mkdir: too many operands
ysh: rm: too few operands
ysh: d: cannot be removed because it is not empty
ysh: d: is a directory
ysh: f: is a plain file
ysh: frob: no such function
ysh: /nope: path does not exist
";
    assert_eq!(err, expected);
}

#[test]
fn test_removing_cwd_returns_to_root() {
    let (status, out, err) = run_script("mkdir /p\nmkdir /p/q\ncd /p/q\nrmr /p\npwd\n");
    assert_eq!(err, "");
    assert_eq!(status, 0);
    assert_eq!(out, "/\n");
}

#[test]
fn test_prompt_command() {
    let mut shell = Shell::default();
    let (mut out, mut err) = (Vec::new(), Vec::new());
    shell
        .run("prompt >>\n".as_bytes(), &mut out, &mut err, true)
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "% >> \n");
}

#[test]
fn test_core_errors_through_api() {
    let mut fs = TreeFs::new();
    let root = fs.root();
    let d = fs.make_directory(root, "d").unwrap();
    fs.make_file(d, "f").unwrap();
    assert_eq!(fs.remove(root, "d"), Err(FsError::NotEmpty("d".into())));
    fs.remove(d, "f").unwrap();
    fs.remove(root, "d").unwrap();
    assert!(!fs.is_live(d));
    assert_eq!(fs.make_directory(d, "z"), Err(FsError::Stale(d.index())));
}
