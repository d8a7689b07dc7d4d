use kegdex::lifecycle::NodeEditor;
use kegdex::{Corpus, KegError, NodeID};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary corpus holding the given nodes, each with a README.md.
pub fn corpus_with(nodes: &[(NodeID, &str)]) -> (TempDir, Corpus) {
    let temp = TempDir::new().unwrap();
    for (id, content) in nodes {
        write_node(temp.path(), *id, content);
    }
    fs::write(temp.path().join("keg"), "title: test keg\nupdated: never\n").unwrap();
    let corpus = Corpus::with_default_layout(temp.path()).unwrap();
    (temp, corpus)
}

pub fn write_node(root: &Path, id: NodeID, content: &str) -> PathBuf {
    let dir = root.join(id.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("README.md"), content).unwrap();
    dir
}

pub fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

/// Editor fake that overwrites the content file.
pub struct WriteEditor(pub &'static str);

impl NodeEditor for WriteEditor {
    fn edit(&self, path: &Path) -> Result<(), KegError> {
        fs::write(path, self.0).map_err(|e| KegError::io(path, e))
    }
}

/// Set the modification time of `path` from an RFC 3339 timestamp.
pub fn set_mtime(path: impl AsRef<Path>, rfc3339: &str) {
    let when = chrono::DateTime::parse_from_rfc3339(rfc3339).unwrap();
    let file = fs::File::options().write(true).open(path.as_ref()).unwrap();
    file.set_modified(std::time::SystemTime::from(when)).unwrap();
}
