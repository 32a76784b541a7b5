use tree_vfs::{TreeFs, VfsPath};

fn main() {
    // the tree starts with the root directory only; cwd is the root
    let mut fs = TreeFs::new();
    let root = fs.root();

    // creates `/docs`, then moves into it
    let docs = fs.make_directory(root, "docs").unwrap();
    fs.set_current_dir(docs);

    // `first` is created in the cwd because its path is relative
    let dir = fs.resolve_path(&VfsPath::parse("")).unwrap();
    let first = fs.make_file(dir, "first").unwrap();
    fs.write_file(first, vec!["Hello".into()]).unwrap();

    // `/second` lands in the root because its path is absolute
    let dir = fs.resolve_path(&VfsPath::parse("/")).unwrap();
    let second = fs.make_file(dir, "second").unwrap();
    fs.write_file(second, vec!["World".into()]).unwrap();

    // back to the root through `..`
    let parent = fs.resolve_path(&VfsPath::parse("..")).unwrap();
    fs.set_current_dir(parent);

    println!("{}", fs.render(root).unwrap());

    let first = fs.resolve_path(&VfsPath::parse("docs/first")).unwrap();
    let second = fs.resolve_path(&VfsPath::parse("/second")).unwrap();
    println!(
        "{}, {}!",
        fs.render(first).unwrap(),
        fs.render(second).unwrap()
    );

    // removes everything but the root
    fs.remove_tree(root).unwrap();
    assert_eq!(fs.live_count(), 1);
}
