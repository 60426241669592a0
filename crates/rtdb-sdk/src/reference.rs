//! Addressable locations in a remote JSON tree.

use std::fmt;
use std::sync::Arc;

use rtdb_transport::{data_url, HttpClientTransport, HttpTransport};

use crate::callbacks::CallbackSet;
use crate::config::ClientConfig;
use crate::error::SdkResult;
use crate::key::{split_path, validate_key};
use crate::root::RootState;

/// A location in the tree.
///
/// The path is computed once, when the reference is created, and never
/// changes afterwards. All references created from the same root share its
/// [`RootState`]; each reference owns its own [`CallbackSet`].
#[derive(Clone)]
pub struct Reference {
    root: Arc<RootState>,
    key: String,
    path: String,
    callbacks: CallbackSet,
}

impl Reference {
    /// Root reference of the tree at `host`.
    pub fn root(
        host: impl Into<String>,
        credential: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self::from_state(Arc::new(RootState::new(host, credential, transport)))
    }

    /// Root reference from a validated config, using the reqwest transport.
    pub fn connect(config: &ClientConfig) -> SdkResult<Self> {
        config.validate()?;
        let transport = HttpClientTransport::new(&config.transport_config())?;
        Ok(Self::root(
            config.host.clone(),
            config.credential.clone(),
            Arc::new(transport),
        ))
    }

    fn from_state(root: Arc<RootState>) -> Self {
        Self {
            root,
            key: String::new(),
            path: String::new(),
            callbacks: CallbackSet::new(),
        }
    }

    fn descend(&self, key: &str, inherit: bool) -> Self {
        Self {
            root: Arc::clone(&self.root),
            key: key.to_string(),
            path: format!("{}/{key}", self.path),
            callbacks: self.inherited(inherit),
        }
    }

    fn inherited(&self, inherit: bool) -> CallbackSet {
        if inherit {
            self.callbacks.clone()
        } else {
            CallbackSet::new()
        }
    }

    // ---- Navigation ----

    /// Reference to the child `key`, optionally inheriting this reference's
    /// callbacks by copy.
    pub fn child(&self, key: &str, inherit: bool) -> SdkResult<Self> {
        validate_key(key)?;
        Ok(self.descend(key, inherit))
    }

    /// Reference to a descendant given as `a/b/c`. Every segment is validated.
    pub fn child_path(&self, path: &str, inherit: bool) -> SdkResult<Self> {
        let keys = split_path(path)?;
        let mut current = self.clone();
        for key in keys {
            current = current.descend(key, inherit);
        }
        Ok(current)
    }

    /// One child per key, in order. Fails on the first invalid key.
    pub fn children<I, S>(&self, keys: I, inherit: bool) -> SdkResult<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| self.child(key.as_ref(), inherit))
            .collect()
    }

    /// Same location with fresh or copied callbacks.
    ///
    /// Copying a root also copies its host and credential, so the copy can
    /// change its credential without affecting the original tree.
    pub fn copy(&self, inherit: bool) -> Self {
        let root = if self.is_root() {
            Arc::new(self.root.deep_copy())
        } else {
            Arc::clone(&self.root)
        };
        Self {
            root,
            key: self.key.clone(),
            path: self.path.clone(),
            callbacks: self.inherited(inherit),
        }
    }

    /// Parent location, rebuilt from the path. `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let (parent_path, _) = self.path.rsplit_once('/')?;
        let key = parent_path.rsplit_once('/').map(|(_, k)| k).unwrap_or_default();
        Some(Self {
            root: Arc::clone(&self.root),
            key: key.to_string(),
            path: parent_path.to_string(),
            callbacks: CallbackSet::new(),
        })
    }

    /// The tree's root, sharing this reference's root state.
    pub fn root_ref(&self) -> Self {
        Self::from_state(Arc::clone(&self.root))
    }

    // ---- Accessors ----

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Last path segment. Empty for the root.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Full path from the root, e.g. `/users/42`. Empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn host(&self) -> &str {
        self.root.host()
    }

    pub fn endpoint(&self) -> String {
        data_url(self.root.host(), &self.path)
    }

    pub fn rules_endpoint(&self) -> String {
        self.root.rules_endpoint()
    }

    pub fn state(&self) -> &Arc<RootState> {
        &self.root
    }

    /// Whether both references belong to the same tree session.
    pub fn shares_root(&self, other: &Reference) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    // ---- Shared credential ----

    pub fn credential(&self) -> String {
        self.root.credential()
    }

    /// Replace the credential for every reference sharing this root.
    pub fn set_credential(&self, credential: impl Into<String>) {
        self.root.set_credential(credential);
    }

    // ---- Callbacks ----

    pub fn callbacks(&self) -> &CallbackSet {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackSet {
        &mut self.callbacks
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("host", &self.root.host())
            .field("path", &self.path)
            .field("subscribers", &self.callbacks.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::Operation;
    use crate::error::SdkError;
    use proptest::prelude::*;
    use rtdb_transport::MockTransport;

    fn root() -> Reference {
        Reference::root("demo.example.com", "", Arc::new(MockTransport::new()))
    }

    #[test]
    fn root_has_empty_path() {
        let r = root();
        assert!(r.is_root());
        assert_eq!(r.path(), "");
        assert_eq!(r.key(), "");
        assert_eq!(r.endpoint(), "https://demo.example.com/.json");
    }

    #[test]
    fn child_paths_concatenate() {
        let ann = root().child("users", false).unwrap().child("42", false).unwrap();
        assert_eq!(ann.path(), "/users/42");
        assert_eq!(ann.key(), "42");
        assert_eq!(ann.endpoint(), "https://demo.example.com/users/42/.json");
        assert!(!ann.is_root());
    }

    #[test]
    fn invalid_child_fails_fast() {
        let r = root();
        assert!(matches!(r.child("", false), Err(SdkError::InvalidPath { .. })));
        assert!(matches!(r.child("a/b", false), Err(SdkError::InvalidPath { .. })));
        assert!(r.child("a.b", false).is_err());
    }

    #[test]
    fn child_path_matches_chained_children() {
        let r = root();
        let chained = r
            .child("a", false)
            .unwrap()
            .child("b", false)
            .unwrap()
            .child("c", false)
            .unwrap();
        let direct = r.child_path("/a/b/c", false).unwrap();
        assert_eq!(direct.path(), chained.path());
        assert_eq!(direct.key(), "c");
        assert!(r.child_path("a//c", false).is_err());
    }

    #[test]
    fn children_preserve_order() {
        let kids = root().children(["x", "y", "z"], false).unwrap();
        let paths: Vec<_> = kids.iter().map(|k| k.path().to_string()).collect();
        assert_eq!(paths, vec!["/x", "/y", "/z"]);
        assert!(root().children(["ok", "no.pe"], false).is_err());
    }

    #[test]
    fn inherited_callbacks_are_independent() {
        let mut parent = root();
        parent.callbacks_mut().get.on_success.subscribe(|_, _| {});

        let mut child = parent.child("users", true).unwrap();
        assert_eq!(child.callbacks().get.on_success.len(), 1);

        child.callbacks_mut().get.on_success.subscribe(|_, _| {});
        child.callbacks_mut().pair_mut(Operation::Set).on_failure.subscribe(|_, _| {});
        assert_eq!(parent.callbacks().get.on_success.len(), 1);
        assert!(parent.callbacks().set.on_failure.is_empty());

        parent.callbacks_mut().get.on_success.clear();
        assert_eq!(child.callbacks().get.on_success.len(), 2);
    }

    #[test]
    fn child_without_inherit_starts_empty() {
        let mut parent = root();
        parent.callbacks_mut().delete.on_failure.subscribe(|_, _| {});
        let child = parent.child("users", false).unwrap();
        assert_eq!(child.callbacks().subscriber_count(), 0);
        let nested = parent.child_path("a/b", false).unwrap();
        assert_eq!(nested.callbacks().subscriber_count(), 0);
        let nested = parent.child_path("a/b", true).unwrap();
        assert_eq!(nested.callbacks().subscriber_count(), 1);
    }

    #[test]
    fn credential_is_shared_across_tree() {
        let r = root();
        let a = r.child("a", false).unwrap();
        let b = r.child("b", false).unwrap().child("c", false).unwrap();
        a.set_credential("token");
        assert_eq!(b.credential(), "token");
        assert_eq!(r.credential(), "token");
        assert!(a.shares_root(&b));
    }

    #[test]
    fn credential_change_does_not_alter_paths() {
        let r = root();
        let a = r.child("a", false).unwrap();
        r.set_credential("other");
        assert_eq!(a.path(), "/a");
    }

    #[test]
    fn copy_of_root_isolates_credential() {
        let original = root();
        original.set_credential("first");
        let copy = original.copy(false);
        copy.set_credential("second");
        assert_eq!(original.credential(), "first");
        assert_eq!(copy.credential(), "second");
        assert!(!copy.shares_root(&original));
        assert_eq!(copy.host(), original.host());
    }

    #[test]
    fn copy_of_child_shares_root() {
        let child = root().child("users", false).unwrap();
        let copy = child.copy(false);
        assert_eq!(copy.path(), "/users");
        copy.set_credential("shared");
        assert_eq!(child.credential(), "shared");
    }

    #[test]
    fn copy_respects_inherit_flag() {
        let mut r = root().child("users", false).unwrap();
        r.callbacks_mut().push.on_success.subscribe(|_, _| {});
        assert_eq!(r.copy(true).callbacks().subscriber_count(), 1);
        assert_eq!(r.copy(false).callbacks().subscriber_count(), 0);
    }

    #[test]
    fn parent_and_root_navigation() {
        let r = root();
        let leaf = r.child_path("users/42/name", false).unwrap();
        let parent = leaf.parent().unwrap();
        assert_eq!(parent.path(), "/users/42");
        assert_eq!(parent.key(), "42");
        let top = parent.parent().unwrap().parent().unwrap();
        assert!(top.is_root());
        assert_eq!(top.key(), "");
        assert!(top.parent().is_none());
        assert!(leaf.root_ref().is_root());
        assert!(leaf.root_ref().shares_root(&r));
    }

    #[test]
    fn rules_endpoint_ignores_path() {
        let leaf = root().child("deep", false).unwrap();
        assert_eq!(
            leaf.rules_endpoint(),
            "https://demo.example.com/.settings/rules.json"
        );
    }

    #[test]
    fn connect_from_config() {
        let config = ClientConfig::new("demo.example.com").with_credential("tok");
        let r = Reference::connect(&config).unwrap();
        assert!(r.is_root());
        assert_eq!(r.credential(), "tok");
        assert!(matches!(
            Reference::connect(&ClientConfig::default()),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn debug_omits_credential() {
        let r = root();
        r.set_credential("hunter2");
        let shown = format!("{:?}", r.child("a", false).unwrap());
        assert!(shown.contains("/a"));
        assert!(!shown.contains("hunter2"));
    }

    proptest! {
        #[test]
        fn two_level_path(k1 in "[a-zA-Z0-9_-]{1,20}", k2 in "[a-zA-Z0-9_-]{1,20}") {
            let r = root();
            let leaf = r.child(&k1, false).unwrap().child(&k2, false).unwrap();
            let expected = format!("/{k1}/{k2}");
            prop_assert_eq!(leaf.path(), expected.as_str());
            prop_assert_eq!(r.path(), "");
        }
    }
}
