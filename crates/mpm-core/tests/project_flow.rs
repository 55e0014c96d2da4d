//! End-to-end flow over the public API: scaffold a project, install
//! libraries from a catalog, and regenerate the build description.

use mpm_core::{init_project, GitClient, GitError, Installer, Manifest, Registry};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Default)]
struct FakeGit {
    clones: RefCell<Vec<(String, String, PathBuf)>>,
}

impl GitClient for FakeGit {
    fn clone_at(&self, source: &str, reference: &str, dest: &Path) -> Result<(), GitError> {
        fs::create_dir_all(dest).unwrap();
        self.clones.borrow_mut().push((
            source.to_string(),
            reference.to_string(),
            dest.to_path_buf(),
        ));
        Ok(())
    }
}

fn catalog() -> Registry {
    Registry::parse(
        r#"
{
    "libraries": {
        "foolib": { "source": "https://github.com/ctpldev/foolib", "version": "v1.0" },
        "barlib": { "source": "https://github.com/ctpldev/barlib", "version": "v2.3" }
    }
}"#,
    )
    .unwrap()
}

#[test]
fn scaffold_install_reinstall() {
    let tmp = TempDir::new().unwrap();
    let layout = init_project(tmp.path().join("myproj"), "myproj", Some("gcc")).unwrap();

    // Freshly scaffolded: empty dependency set, placeholder entry point,
    // a Makefile whose default target depends on the placeholder's object.
    let manifest = Manifest::load(&layout.manifest_path).unwrap();
    assert_eq!(manifest.name, "myproj");
    assert_eq!(manifest.platform, "gcc");
    assert!(manifest.dependencies.is_empty());
    assert!(layout.src_dir.join("main.c").is_file());

    let makefile = fs::read_to_string(layout.root.join("Makefile")).unwrap();
    assert!(makefile.contains("all: $(BIN)\n"));
    assert!(makefile.contains("OBJS = build/obj/main.o\n"));

    // First install clones at the pinned ref and links the library.
    let git = FakeGit::default();
    let installer = Installer::new(&layout, &git);
    installer.install_from("foolib", &catalog()).unwrap();

    {
        let clones = git.clones.borrow();
        assert_eq!(clones.len(), 1);
        assert_eq!(clones[0].1, "v1.0");
        assert_eq!(clones[0].2, layout.lib_dir.join("foolib"));
    }
    let manifest = Manifest::load(&layout.manifest_path).unwrap();
    assert_eq!(manifest.dependencies["foolib"], "v1.0");
    let makefile = fs::read_to_string(layout.root.join("Makefile")).unwrap();
    assert!(makefile.contains("-lfoolib"));

    // Second install is a no-op: no clone, no content change.
    let manifest_before = fs::read_to_string(&layout.manifest_path).unwrap();
    let makefile_before = fs::read_to_string(layout.root.join("Makefile")).unwrap();
    installer.install_from("foolib", &catalog()).unwrap();

    assert_eq!(git.clones.borrow().len(), 1);
    assert_eq!(
        fs::read_to_string(&layout.manifest_path).unwrap(),
        manifest_before
    );
    assert_eq!(
        fs::read_to_string(layout.root.join("Makefile")).unwrap(),
        makefile_before
    );
}

#[test]
fn link_order_is_independent_of_install_order() {
    let tmp = TempDir::new().unwrap();
    let git = FakeGit::default();

    let first = init_project(tmp.path().join("first"), "first", Some("gcc")).unwrap();
    let installer = Installer::new(&first, &git);
    installer.install_from("foolib", &catalog()).unwrap();
    installer.install_from("barlib", &catalog()).unwrap();

    let second = init_project(tmp.path().join("second"), "second", Some("gcc")).unwrap();
    let installer = Installer::new(&second, &git);
    installer.install_from("barlib", &catalog()).unwrap();
    installer.install_from("foolib", &catalog()).unwrap();

    let link_line = |root: &Path| {
        let makefile = fs::read_to_string(root.join("Makefile")).unwrap();
        makefile
            .lines()
            .find(|line| line.starts_with("LDLIBS"))
            .unwrap()
            .to_string()
    };
    assert_eq!(link_line(&first.root), "LDLIBS = -lbarlib -lfoolib");
    assert_eq!(link_line(&second.root), link_line(&first.root));
}
