use crate::core::interfaces::{ModuleResolver, Resolution};
use crate::core::models::Environment;
use crate::utils::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions tried, in order, when a specifier has none
const EXTENSIONS: &[&str] = &[".js", ".json"];

const INDEX_FILES: &[&str] = &["index.js", "index.json"];

/// Host runtime modules provided outside the artifact
const NODE_BUILTINS: &[&str] = &[
    "assert", "async_hooks", "buffer", "child_process", "cluster", "console", "constants",
    "crypto", "dgram", "dns", "domain", "events", "fs", "http", "http2", "https", "module",
    "net", "os", "path", "perf_hooks", "process", "punycode", "querystring", "readline",
    "repl", "stream", "string_decoder", "sys", "timers", "tls", "tty", "url", "util", "v8",
    "vm", "worker_threads", "zlib",
];

/// The subset of package.json the resolver reads
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub browser: Option<BrowserField>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BrowserField {
    String(String),
    Object(serde_json::Map<String, serde_json::Value>),
}

/// Node.js-style CommonJS module resolution
pub struct NodeModuleResolver {
    environment: Environment,
    /// Cache of parsed package.json files, `None` when unreadable
    package_cache: DashMap<PathBuf, Option<PackageJson>>,
}

impl NodeModuleResolver {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            package_cache: DashMap::new(),
        }
    }

    pub fn is_builtin(specifier: &str) -> bool {
        let name = specifier.strip_prefix("node:").unwrap_or(specifier);
        let root = name.split('/').next().unwrap_or(name);
        NODE_BUILTINS.contains(&root)
    }

    fn is_relative(specifier: &str) -> bool {
        specifier == "."
            || specifier == ".."
            || specifier.starts_with("./")
            || specifier.starts_with("../")
    }

    /// Resolve a node_modules package, walking up from the importing file
    fn resolve_node_module(&self, specifier: &str, from_file: &Path) -> Option<PathBuf> {
        let (package_name, subpath) = Self::parse_package_specifier(specifier);
        let mut current_dir = from_file.parent();

        while let Some(dir) = current_dir {
            if dir.file_name().map(|n| n == "node_modules").unwrap_or(false) {
                current_dir = dir.parent();
                continue;
            }

            let package_dir = dir.join("node_modules").join(&package_name);
            if package_dir.is_dir() {
                let resolved = match &subpath {
                    Some(subpath) => self.resolve_file_or_directory(&package_dir.join(subpath)),
                    None => self.resolve_directory(&package_dir),
                };
                if resolved.is_some() {
                    return resolved;
                }
            }

            current_dir = dir.parent();
        }

        None
    }

    /// Split a bare specifier into package name and optional subpath
    fn parse_package_specifier(specifier: &str) -> (String, Option<String>) {
        let mut parts = specifier.splitn(if specifier.starts_with('@') { 3 } else { 2 }, '/');

        let package_name = if specifier.starts_with('@') {
            let scope = parts.next().unwrap_or_default();
            match parts.next() {
                Some(name) => format!("{}/{}", scope, name),
                None => scope.to_string(),
            }
        } else {
            parts.next().unwrap_or_default().to_string()
        };

        let subpath = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        (package_name, subpath)
    }

    fn resolve_file_or_directory(&self, path: &Path) -> Option<PathBuf> {
        self.resolve_as_file(path)
            .or_else(|| self.resolve_directory(path))
    }

    /// The path itself, then the path with each extension appended
    fn resolve_as_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        EXTENSIONS.iter().find_map(|ext| {
            let mut candidate = OsString::from(path.as_os_str());
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            candidate.is_file().then_some(candidate)
        })
    }

    /// Manifest entry of a directory, then its index file
    fn resolve_directory(&self, dir: &Path) -> Option<PathBuf> {
        if !dir.is_dir() {
            return None;
        }

        if let Some(package) = self.read_package_json(&dir.join("package.json")) {
            for entry in self.entry_fields(&package) {
                let entry_path = dir.join(entry);
                let resolved = self
                    .resolve_as_file(&entry_path)
                    .or_else(|| self.resolve_index(&entry_path));
                if resolved.is_some() {
                    return resolved;
                }
            }
        }

        self.resolve_index(dir)
    }

    fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
        INDEX_FILES
            .iter()
            .map(|index| dir.join(index))
            .find(|candidate| candidate.is_file())
    }

    /// Manifest fields consulted for the package entry, in order
    fn entry_fields<'p>(&self, package: &'p PackageJson) -> Vec<&'p str> {
        let mut fields = Vec::new();

        if self.environment == Environment::Browser {
            if let Some(BrowserField::String(browser)) = &package.browser {
                fields.push(browser.as_str());
            }
        }
        if let Some(main) = &package.main {
            fields.push(main.as_str());
        }

        fields
    }

    fn read_package_json(&self, path: &Path) -> Option<PackageJson> {
        if let Some(cached) = self.package_cache.get(path) {
            return cached.value().clone();
        }

        let package = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<PackageJson>(&content).ok());

        self.package_cache.insert(path.to_path_buf(), package.clone());
        package
    }
}

impl ModuleResolver for NodeModuleResolver {
    fn resolve(&self, specifier: &str, from: &Path) -> Result<Resolution> {
        let found = if Self::is_relative(specifier) {
            let base = from.parent().unwrap_or_else(|| Path::new("."));
            self.resolve_file_or_directory(&base.join(specifier))
        } else if specifier.starts_with('/') {
            self.resolve_file_or_directory(Path::new(specifier))
        } else if specifier.starts_with("node:") {
            None
        } else {
            self.resolve_node_module(specifier, from)
        };

        match found {
            Some(path) => Ok(Resolution::File(path.canonicalize()?)),
            None if Self::is_builtin(specifier) => Ok(Resolution::Builtin(specifier.to_string())),
            None => Ok(Resolution::NotFound),
        }
    }
}
