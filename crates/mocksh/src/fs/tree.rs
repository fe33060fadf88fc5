//! In-memory filesystem tree

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};

/// One filesystem node: a directory of named children or a file with
/// string content. `BTreeMap` keeps children ordered by name, which is
/// what listing and find traversal rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir(BTreeMap<String, Node>),
    File(String),
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }
}

/// Read-only virtual filesystem.
///
/// Built from a nested mapping where keys are path-like strings (a
/// trailing slash is tolerated) and values are either nested mappings
/// (subdirectories, merged recursively) or scalars coerced to file
/// content. After construction the tree is immutable.
#[derive(Debug)]
pub struct VirtualFs {
    root: Node,
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self {
            root: Node::Dir(BTreeMap::new()),
        }
    }
}

impl VirtualFs {
    /// Create an empty filesystem containing only the root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filesystem from a nested mapping literal.
    ///
    /// ```
    /// use mocksh::VirtualFs;
    /// use serde_json::json;
    ///
    /// let fs = VirtualFs::from_tree(&json!({
    ///     "/home/user": {
    ///         "notes.txt": "remember the flag",
    ///         "logs/": { "app.log": "I/App: started" },
    ///     },
    /// })).unwrap();
    /// assert!(fs.is_dir("/home/user/logs", "/"));
    /// ```
    pub fn from_tree(tree: &Value) -> Result<Self> {
        let mut fs = Self::new();
        if let Value::Object(entries) = tree {
            for (raw_path, value) in entries {
                let path = raw_path.trim_end_matches('/');
                let path = if path.is_empty() { "/" } else { path };
                fs.add_path(path, value)?;
            }
        }
        Ok(fs)
    }

    fn add_path(&mut self, path: &str, value: &Value) -> Result<()> {
        match value {
            Value::Object(children) => {
                self.ensure_dir(path)?;
                for (name, child) in children {
                    let child_name = name.trim_end_matches('/');
                    let child_path = join(path, child_name);
                    self.add_path(&child_path, child)?;
                }
                Ok(())
            }
            _ => {
                let parent = dirname(path);
                let filename = basename(path).to_string();
                let dir = self.ensure_dir(&parent)?;
                dir.insert(filename, Node::File(scalar_content(value)));
                Ok(())
            }
        }
    }

    fn ensure_dir(&mut self, path: &str) -> Result<&mut BTreeMap<String, Node>> {
        let Node::Dir(ref mut root) = self.root else {
            return Err(Error::Internal("filesystem root is not a directory".to_string()));
        };
        let mut dir = root;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let node = dir
                .entry(part.to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            match node {
                Node::Dir(children) => dir = children,
                Node::File(_) => {
                    return Err(Error::Execution(format!("path is not directory: {path}")));
                }
            }
        }
        Ok(dir)
    }

    /// Resolve `path` against `cwd`: absolute paths stand alone, relative
    /// paths join the cwd; `.`/`..` are collapsed lexically. The result
    /// always starts with `/` and never climbs above the root.
    pub fn resolve(&self, path: &str, cwd: &str) -> String {
        normalize(path, cwd)
    }

    fn node(&self, resolved: &str) -> Option<&Node> {
        let mut node = &self.root;
        for part in resolved.split('/').filter(|p| !p.is_empty()) {
            match node {
                Node::Dir(children) => node = children.get(part)?,
                Node::File(_) => return None,
            }
        }
        Some(node)
    }

    fn children_of(&self, resolved: &str) -> Option<&BTreeMap<String, Node>> {
        match self.node(resolved)? {
            Node::Dir(children) => Some(children),
            Node::File(_) => None,
        }
    }

    /// Whether `path` resolves to any node. Never errors.
    pub fn exists(&self, path: &str, cwd: &str) -> bool {
        let resolved = normalize(path, cwd);
        self.node(&resolved).is_some()
    }

    /// Whether `path` resolves to a directory. Never errors.
    pub fn is_dir(&self, path: &str, cwd: &str) -> bool {
        let resolved = normalize(path, cwd);
        self.children_of(&resolved).is_some()
    }

    /// Read a file's content. Missing nodes and directories both fail.
    pub fn read_file(&self, path: &str, cwd: &str) -> Result<String> {
        let resolved = normalize(path, cwd);
        match self.node(&resolved) {
            Some(Node::File(content)) => Ok(content.clone()),
            _ => Err(Error::NotFound(path.to_string())),
        }
    }

    /// List a directory's child names, sorted lexicographically.
    pub fn list_dir(&self, path: &str, cwd: &str) -> Result<Vec<String>> {
        let resolved = normalize(path, cwd);
        match self.children_of(&resolved) {
            Some(children) => Ok(children.keys().cloned().collect()),
            None => Err(Error::NotFound(path.to_string())),
        }
    }

    /// Depth-first find: report every node under `start` (inclusive) whose
    /// basename contains `name_contains`, case-insensitively. An empty
    /// pattern matches everything; a missing start yields no results.
    pub fn find(&self, start: &str, cwd: &str, name_contains: &str) -> Vec<String> {
        let root_path = normalize(start, cwd);
        let pattern = name_contains.to_lowercase();
        let mut out = Vec::new();
        if let Some(node) = self.node(&root_path) {
            walk(&root_path, node, &pattern, &mut out);
        }
        out
    }
}

fn walk(path: &str, node: &Node, pattern: &str, out: &mut Vec<String>) {
    let base = if path == "/" { "/" } else { basename(path) };
    if pattern.is_empty() || base.to_lowercase().contains(pattern) {
        out.push(path.to_string());
    }
    if let Node::Dir(children) = node {
        for (name, child) in children {
            let child_path = join(path, name);
            walk(&child_path, child, pattern, out);
        }
    }
}

fn scalar_content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir == "/" || dir.is_empty() {
        format!("/{name}")
    } else {
        format!("{}/{name}", dir.trim_end_matches('/'))
    }
}

fn dirname(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lexical normalization: absolute-or-joined, then `.`/`..` collapsed
/// segment by segment without ever popping past the root.
fn normalize(path: &str, cwd: &str) -> String {
    let cwd = if cwd.is_empty() { "/" } else { cwd };
    if path.is_empty() {
        return normalize(cwd, "/");
    }
    let merged = if path.starts_with('/') {
        path.to_string()
    } else {
        join(cwd, path)
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in merged.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}
