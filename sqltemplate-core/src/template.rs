use crate::{DataError, Error, ParameterSource, Result};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::Arc,
};

/// Turns a resource identifier into SQL text.
///
/// The context carries the values of the invocation. The text returned for
/// a resource must not depend on it: values are bound later as parameters.
pub trait TemplateResolver {
    fn resolve(&self, resource: &str, context: &dyn ParameterSource) -> Result<Arc<str>>;
}

impl<R: TemplateResolver + ?Sized> TemplateResolver for &R {
    fn resolve(&self, resource: &str, context: &dyn ParameterSource) -> Result<Arc<str>> {
        (**self).resolve(resource, context)
    }
}

impl<R: TemplateResolver + ?Sized> TemplateResolver for Arc<R> {
    fn resolve(&self, resource: &str, context: &dyn ParameterSource) -> Result<Arc<str>> {
        (**self).resolve(resource, context)
    }
}

/// The resource is the SQL text itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl TemplateResolver for PlainText {
    fn resolve(&self, resource: &str, _context: &dyn ParameterSource) -> Result<Arc<str>> {
        Ok(resource.into())
    }
}

/// SQL text read from files below a root directory, lines joined by `\n`.
#[derive(Debug, Clone)]
pub struct TextFile {
    root: PathBuf,
}

impl TextFile {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads every file once.
    pub fn cached(self) -> TemplateCache<Self> {
        TemplateCache::new(self)
    }
}

impl TemplateResolver for TextFile {
    fn resolve(&self, resource: &str, _context: &dyn ParameterSource) -> Result<Arc<str>> {
        let path = self.root.join(resource.trim_start_matches('/'));
        log::debug!("Loading template `{}`", path.display());
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text.lines().collect::<Vec<_>>().join("\n").into()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(DataError::NotFound(resource.to_string()).into())
            }
            Err(e) => Err(Error::new(e).context(format!(
                "While reading template `{}`",
                path.display()
            ))),
        }
    }
}

/// Resolves each resource once and serves the text from memory afterwards.
///
/// Entries are keyed by resource only. Failures are not cached.
#[derive(Debug)]
pub struct TemplateCache<R> {
    resolver: R,
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl<R: TemplateResolver> TemplateCache<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            cache: Default::default(),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: TemplateResolver> TemplateResolver for TemplateCache<R> {
    fn resolve(&self, resource: &str, context: &dyn ParameterSource) -> Result<Arc<str>> {
        if let Some(text) = self.cache.read().get(resource) {
            log::trace!("Template `{resource}` served from cache");
            return Ok(text.clone());
        }
        let text = self.resolver.resolve(resource, context)?;
        Ok(self
            .cache
            .write()
            .entry(resource.to_string())
            .or_insert(text)
            .clone())
    }
}
