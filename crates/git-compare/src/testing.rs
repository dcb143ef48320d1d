//! Scripted repository and archive fixtures for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Write;

use bstr::BString;
use git_hash::ObjectId;
use git_repository::{NameStatus, ObjectKind, RepoError, RepositoryAccess, TreeEntry};

pub fn oid(digit: char) -> ObjectId {
    digit.to_string().repeat(40).parse().unwrap()
}

/// A query made against [`FakeRepo`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve(String),
    TreeOf(String),
    Archive(ObjectId),
    ListTree(String),
    DiffQuiet(String, String),
    DiffNameStatus(String, String),
    DiffStat(String, String),
    DiffUnified(String, String),
    CommitSubject(String),
    ConfigGet(String),
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

fn failed(command: &str) -> RepoError {
    RepoError::Command {
        command: command.to_string(),
        status: "exit code 128".to_string(),
        stderr: "fatal: scripted failure".to_string(),
    }
}

/// In-memory [`RepositoryAccess`] answering from scripted tables and
/// recording every call.
#[derive(Debug, Default)]
pub struct FakeRepo {
    objects: HashMap<String, (ObjectId, ObjectKind)>,
    trees: HashMap<String, ObjectId>,
    subjects: HashMap<String, String>,
    archives: HashMap<ObjectId, Vec<u8>>,
    listings: HashMap<String, Vec<TreeEntry>>,
    changed: HashSet<(String, String)>,
    name_status: HashMap<(String, String), Vec<NameStatus>>,
    unified: HashMap<(String, String), Vec<BString>>,
    config: HashMap<String, String>,
    fail_diffs: bool,
    fail_reports: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `spec` names commit `id` whose tree is `tree`.
    pub fn commit(mut self, spec: &str, id: ObjectId, tree: ObjectId) -> Self {
        self.objects.insert(spec.to_string(), (id, ObjectKind::Commit));
        self.trees.insert(spec.to_string(), tree);
        self
    }

    /// `spec` names an object of `kind`; trees peel to themselves.
    pub fn object(mut self, spec: &str, id: ObjectId, kind: ObjectKind) -> Self {
        if kind == ObjectKind::Tree {
            self.trees.insert(spec.to_string(), id);
        }
        self.objects.insert(spec.to_string(), (id, kind));
        self
    }

    pub fn subject(mut self, spec: &str, subject: &str) -> Self {
        self.subjects.insert(spec.to_string(), subject.to_string());
        self
    }

    pub fn archive(mut self, tree: ObjectId, tar: Vec<u8>) -> Self {
        self.archives.insert(tree, tar);
        self
    }

    pub fn listing(mut self, spec: &str, entries: Vec<TreeEntry>) -> Self {
        self.listings.insert(spec.to_string(), entries);
        self
    }

    /// `git diff --quiet left right` reports changes.
    pub fn changed(mut self, left: &str, right: &str) -> Self {
        self.changed.insert(pair(left, right));
        self
    }

    pub fn name_status(mut self, left: &str, right: &str, entries: Vec<NameStatus>) -> Self {
        self.name_status.insert(pair(left, right), entries);
        self
    }

    pub fn unified(mut self, left: &str, right: &str, lines: Vec<BString>) -> Self {
        self.unified.insert(pair(left, right), lines);
        self
    }

    pub fn config(mut self, key: &str, value: &str) -> Self {
        self.config.insert(key.to_string(), value.to_string());
        self
    }

    /// Every diff query fails.
    pub fn fail_diffs(mut self) -> Self {
        self.fail_diffs = true;
        self
    }

    /// Report queries fail; `diff_quiet` still answers.
    pub fn fail_reports(mut self) -> Self {
        self.fail_reports = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn report_check(&self, command: &str) -> Result<(), RepoError> {
        if self.fail_diffs || self.fail_reports {
            Err(failed(command))
        } else {
            Ok(())
        }
    }
}

impl RepositoryAccess for FakeRepo {
    fn resolve_reference(&self, spec: &str) -> Result<(ObjectId, ObjectKind), RepoError> {
        self.record(Call::Resolve(spec.to_string()));
        self.objects
            .get(spec)
            .cloned()
            .ok_or_else(|| RepoError::UnknownRevision(spec.to_string()))
    }

    fn tree_id_of(&self, spec: &str) -> Result<ObjectId, RepoError> {
        self.record(Call::TreeOf(spec.to_string()));
        self.trees
            .get(spec)
            .copied()
            .ok_or_else(|| RepoError::NotATree(spec.to_string()))
    }

    fn materialize_archive(&self, tree: &ObjectId, sink: &mut dyn Write) -> Result<(), RepoError> {
        self.record(Call::Archive(*tree));
        let tar = self.archives.get(tree).ok_or_else(|| failed("git archive"))?;
        sink.write_all(tar).map_err(|e| RepoError::Util(e.into()))
    }

    fn list_tree_recursive(&self, spec: &str) -> Result<Vec<TreeEntry>, RepoError> {
        self.record(Call::ListTree(spec.to_string()));
        self.listings.get(spec).cloned().ok_or_else(|| failed("git ls-tree"))
    }

    fn diff_quiet(&self, left: &str, right: &str) -> Result<bool, RepoError> {
        self.record(Call::DiffQuiet(left.to_string(), right.to_string()));
        if self.fail_diffs {
            return Err(failed("git diff --quiet"));
        }
        Ok(!self.changed.contains(&pair(left, right)))
    }

    fn diff_name_status(&self, left: &str, right: &str) -> Result<Vec<NameStatus>, RepoError> {
        self.record(Call::DiffNameStatus(left.to_string(), right.to_string()));
        self.report_check("git diff --name-status")?;
        Ok(self.name_status.get(&pair(left, right)).cloned().unwrap_or_default())
    }

    fn diff_stat(&self, left: &str, right: &str) -> Result<String, RepoError> {
        self.record(Call::DiffStat(left.to_string(), right.to_string()));
        self.report_check("git diff --stat")?;
        let files = self.name_status.get(&pair(left, right)).map_or(0, Vec::len);
        Ok(if files == 0 {
            String::new()
        } else {
            format!(" {files} files changed")
        })
    }

    fn diff_unified(&self, left: &str, right: &str) -> Result<Vec<BString>, RepoError> {
        self.record(Call::DiffUnified(left.to_string(), right.to_string()));
        self.report_check("git diff")?;
        Ok(self.unified.get(&pair(left, right)).cloned().unwrap_or_default())
    }

    fn commit_subject(&self, spec: &str) -> Result<Option<String>, RepoError> {
        self.record(Call::CommitSubject(spec.to_string()));
        Ok(self.subjects.get(spec).cloned())
    }

    fn config_get(&self, key: &str) -> Result<Option<String>, RepoError> {
        self.record(Call::ConfigGet(key.to_string()));
        Ok(self.config.get(key).cloned())
    }
}

/// Writes ustar archives the way `git archive --format=tar` lays them out.
#[derive(Debug, Default)]
pub struct TarBuilder {
    bytes: Vec<u8>,
}

impl TarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(self, path: &str, data: &[u8], mode: u32, mtime: u64) -> Self {
        self.entry(b'0', path.as_bytes(), b"", data, mode, mtime, b"")
    }

    pub fn directory(self, path: &str, mtime: u64) -> Self {
        self.entry(b'5', path.as_bytes(), b"", b"", 0o775, mtime, b"")
    }

    pub fn symlink(self, path: &str, target: &str, mtime: u64) -> Self {
        self.entry(b'2', path.as_bytes(), b"", b"", 0o777, mtime, target.as_bytes())
    }

    /// Extended header applying to the next member.
    pub fn pax_extended(self, records: &[(&str, &str)]) -> Self {
        let data = pax_records(records);
        self.entry(b'x', b"pax_header", b"", &data, 0o666, 0, b"")
    }

    pub fn pax_global(self, records: &[(&str, &str)]) -> Self {
        let data = pax_records(records);
        self.entry(b'g', b"pax_global_header", b"", &data, 0o666, 0, b"")
    }

    #[allow(clippy::too_many_arguments)]
    pub fn entry(
        mut self,
        typeflag: u8,
        name: &[u8],
        prefix: &[u8],
        data: &[u8],
        mode: u32,
        mtime: u64,
        link: &[u8],
    ) -> Self {
        let mut header = [0u8; 512];
        let name_len = name.len().min(100);
        header[..name_len].copy_from_slice(&name[..name_len]);
        header[100..108].copy_from_slice(format!("{mode:07o}\0").as_bytes());
        header[108..116].copy_from_slice(b"0000000\0");
        header[116..124].copy_from_slice(b"0000000\0");
        header[124..136].copy_from_slice(format!("{:011o}\0", data.len()).as_bytes());
        header[136..148].copy_from_slice(format!("{mtime:011o}\0").as_bytes());
        header[156] = typeflag;
        let link_len = link.len().min(100);
        header[157..157 + link_len].copy_from_slice(&link[..link_len]);
        header[257..263].copy_from_slice(b"ustar\0");
        header[263..265].copy_from_slice(b"00");
        let prefix_len = prefix.len().min(155);
        header[345..345 + prefix_len].copy_from_slice(&prefix[..prefix_len]);

        header[148..156].copy_from_slice(b"        ");
        let checksum: u32 = header.iter().map(|&b| u32::from(b)).sum();
        header[148..156].copy_from_slice(format!("{checksum:06o}\0 ").as_bytes());

        self.bytes.extend_from_slice(&header);
        self.bytes.extend_from_slice(data);
        let padding = (512 - data.len() % 512) % 512;
        self.bytes.extend(std::iter::repeat(0u8).take(padding));
        self
    }

    /// Append the two zero blocks that end an archive.
    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(&[0u8; 1024]);
        self.bytes
    }
}

fn pax_records(records: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (key, value) in records {
        let body = format!(" {key}={value}\n");
        let mut len = body.len() + 1;
        while len.to_string().len() + body.len() != len {
            len = len.to_string().len() + body.len();
        }
        out.extend_from_slice(format!("{len}{body}").as_bytes());
    }
    out
}
