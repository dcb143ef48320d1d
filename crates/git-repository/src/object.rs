use std::fmt;

use bstr::{BString, ByteSlice};
use git_hash::ObjectId;

/// The kind of object a reference resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
    /// Anything git reports that is not one of the four core kinds.
    Other(String),
}

impl ObjectKind {
    /// Parse the type name printed by `git cat-file -t`.
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "commit" => Self::Commit,
            "tree" => Self::Tree,
            "blob" => Self::Blob,
            "tag" => Self::Tag,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Commit => "commit",
            Self::Tree => "tree",
            Self::Blob => "blob",
            Self::Tag => "tag",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Octal mode as printed by git (`100644`, `100755`, `120000`, `160000`).
    pub mode: String,
    /// Object kind (`blob` for files and symlinks, `commit` for submodules).
    pub kind: ObjectKind,
    pub oid: ObjectId,
    /// Full path from the tree root.
    pub path: BString,
}

/// Parse `git ls-tree -r -z` output.
///
/// Records look like `<mode> SP <type> SP <oid> TAB <path> NUL`. Paths are
/// raw bytes because `-z` disables quoting.
pub fn parse_ls_tree(output: &[u8]) -> Result<Vec<TreeEntry>, String> {
    let mut entries = Vec::new();
    for record in output.split(|&b| b == 0) {
        if record.is_empty() {
            continue;
        }
        let tab = record
            .find_byte(b'\t')
            .ok_or_else(|| format!("missing tab in record {:?}", record.as_bstr()))?;
        let (meta, path) = (&record[..tab], &record[tab + 1..]);
        let meta = meta
            .to_str()
            .map_err(|_| format!("non-UTF-8 metadata in record {:?}", record.as_bstr()))?;

        let mut fields = meta.split(' ');
        let (Some(mode), Some(kind), Some(oid), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(format!("malformed record {:?}", record.as_bstr()));
        };
        let oid = ObjectId::from_hex(oid).map_err(|e| format!("bad object id '{oid}': {e}"))?;

        entries.push(TreeEntry {
            mode: mode.to_string(),
            kind: ObjectKind::from_type_name(kind),
            oid,
            path: BString::from(path),
        });
    }
    Ok(entries)
}
