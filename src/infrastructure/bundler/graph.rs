use crate::core::interfaces::{ModuleResolver, Resolution};
use crate::core::models::{ContentKind, ModuleLink, ModuleNode};
use crate::infrastructure::processors::{find_requires, AssetProcessor};
use crate::utils::position::line_col;
use crate::utils::{BuildError, ErrorContext, Logger, Result};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Modules reachable from one entry, keyed by canonical path
#[derive(Debug)]
pub struct DependencyGraph {
    entry: PathBuf,
    nodes: BTreeMap<PathBuf, ModuleNode>,
    paths_by_key: HashMap<String, PathBuf>,
}

impl DependencyGraph {
    /// Resolve the graph from `entry`. Keys are relative to `base_dir`.
    pub async fn build(
        component: &str,
        entry: &Path,
        base_dir: &Path,
        resolver: Arc<dyn ModuleResolver>,
        assets: &AssetProcessor,
    ) -> Result<Self> {
        let entry = entry.canonicalize()?;
        let base_dir = base_dir.canonicalize()?;
        let mut nodes = BTreeMap::new();
        let mut paths_by_key = HashMap::new();
        let mut queue = VecDeque::from([entry.clone()]);

        while let Some(path) = queue.pop_front() {
            if nodes.contains_key(&path) {
                continue;
            }

            let node = Self::load_module(component, &path, &base_dir, &resolver, assets).await?;
            for (_, link) in &node.dependencies {
                if let ModuleLink::Internal(key) = link {
                    let dependency = Self::path_for_key(&base_dir, key);
                    if !nodes.contains_key(&dependency) {
                        queue.push_back(dependency);
                    }
                }
            }

            Logger::resolved_module(&node.key);
            paths_by_key.insert(node.key.clone(), path.clone());
            nodes.insert(path, node);
        }

        Ok(Self {
            entry,
            nodes,
            paths_by_key,
        })
    }

    async fn load_module(
        component: &str,
        path: &Path,
        base_dir: &Path,
        resolver: &Arc<dyn ModuleResolver>,
        assets: &AssetProcessor,
    ) -> Result<ModuleNode> {
        let kind = path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(ContentKind::from_extension)
            .ok_or_else(|| {
                BuildError::bundle_with_context(
                    component,
                    format!("Unsupported module type: {}", path.display()),
                    ErrorContext::new().with_file(path.to_path_buf()),
                )
            })?;

        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            BuildError::bundle_with_context(
                component,
                format!("Cannot read module: {}", e),
                ErrorContext::new().with_file(path.to_path_buf()),
            )
        })?;

        let transformed = assets.transform(kind, &raw, path).map_err(|e| {
            BuildError::bundle_with_context(
                component,
                format!("{:#}", e),
                ErrorContext::new().with_file(path.to_path_buf()),
            )
        })?;

        let mut dependencies: Vec<(String, ModuleLink)> = Vec::new();
        if kind == ContentKind::Script {
            let calls = find_requires(&raw).map_err(|e| {
                BuildError::bundle_with_context(
                    component,
                    format!("{:#}", e),
                    ErrorContext::new().with_file(path.to_path_buf()),
                )
            })?;
            let mut seen = HashSet::new();
            let calls: Vec<_> = calls
                .into_iter()
                .filter(|call| seen.insert(call.specifier.clone()))
                .collect();

            // the resolver stats and reads package manifests synchronously
            let specifiers: Vec<String> = calls.iter().map(|c| c.specifier.clone()).collect();
            let from = path.to_path_buf();
            let resolver = Arc::clone(resolver);
            let resolutions = tokio::task::spawn_blocking(move || {
                specifiers
                    .iter()
                    .map(|specifier| resolver.resolve(specifier, &from))
                    .collect::<Result<Vec<Resolution>>>()
            })
            .await
            .map_err(|e| BuildError::bundle(component, format!("Resolver task failed: {}", e)))??;

            for (call, resolution) in calls.into_iter().zip(resolutions) {
                let link = match resolution {
                    Resolution::File(resolved) => {
                        ModuleLink::Internal(module_key(base_dir, &resolved))
                    }
                    Resolution::Builtin(name) => ModuleLink::External(name),
                    Resolution::NotFound => {
                        let (line, column) = line_col(&raw, call.offset);
                        return Err(BuildError::bundle_with_context(
                            component,
                            format!("Cannot find module '{}'", call.specifier),
                            ErrorContext::new()
                                .with_file(path.to_path_buf())
                                .with_location(line, column)
                                .with_specifier(&call.specifier),
                        ));
                    }
                };
                dependencies.push((call.specifier, link));
            }
        }

        Ok(ModuleNode {
            path: path.to_path_buf(),
            key: module_key(base_dir, path),
            kind,
            raw,
            transformed,
            dependencies,
        })
    }

    fn path_for_key(base_dir: &Path, key: &str) -> PathBuf {
        let mut path = base_dir.to_path_buf();
        for part in key.split('/') {
            match part {
                "." | "" => {}
                ".." => {
                    path.pop();
                }
                other => path.push(other),
            }
        }
        path
    }

    pub fn entry(&self) -> &ModuleNode {
        &self.nodes[&self.entry]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn by_key(&self, key: &str) -> Option<&ModuleNode> {
        self.paths_by_key.get(key).and_then(|path| self.nodes.get(path))
    }

    /// Dependencies before dependents, starting from the entry.
    ///
    /// Dependencies are visited in source order; a cycle is cut at the first
    /// module seen twice, so the order is stable for an unchanged graph.
    pub fn topological_order(&self) -> Vec<&ModuleNode> {
        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(self.nodes.len());
        self.visit(self.entry(), &mut visited, &mut order);
        order
    }

    fn visit<'g>(
        &'g self,
        node: &'g ModuleNode,
        visited: &mut HashSet<&'g str>,
        order: &mut Vec<&'g ModuleNode>,
    ) {
        if !visited.insert(node.key.as_str()) {
            return;
        }

        for (_, link) in &node.dependencies {
            if let ModuleLink::Internal(key) = link {
                if let Some(dependency) = self.by_key(key) {
                    self.visit(dependency, visited, order);
                }
            }
        }

        order.push(node);
    }
}

/// Stable module key: `path` relative to `base`, `/`-separated.
pub fn module_key(base: &Path, path: &Path) -> String {
    let base_parts: Vec<Component> = base.components().collect();
    let path_parts: Vec<Component> = path.components().collect();
    let common = base_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); base_parts.len() - common];
    parts.extend(
        path_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.first().map(|p| p == "..").unwrap_or(false) {
        parts.join("/")
    } else {
        format!("./{}", parts.join("/"))
    }
}
