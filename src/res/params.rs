//! Settings of the resource manager and the per-path hints handed to loaders.

use std::str::FromStr;

use inlinable_string::InlinableString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::errors::*;
use crate::res::resource::Status;

/// The default number of slots a manager allocates.
pub const MAX_RESOURCES: usize = 256;

/// Decides which settled states are delivered to the callbacks of pending refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyPolicy {
    /// Callbacks fire only for `Status::Loaded`. Refs waiting on a failed
    /// resource are dropped from the pending list silently; consumers have to
    /// poll `status` to observe the failure.
    LoadedOnly,
    /// Callbacks fire once the resource settles, both on `Loaded` and `Error`.
    Settled,
}

impl Default for NotifyPolicy {
    fn default() -> Self {
        NotifyPolicy::LoadedOnly
    }
}

impl NotifyPolicy {
    #[inline]
    pub fn notifies(self, status: Status) -> bool {
        match (self, status) {
            (_, Status::Unloaded) => false,
            (_, Status::Loaded) => true,
            (NotifyPolicy::Settled, Status::Error) => true,
            (NotifyPolicy::LoadedOnly, Status::Error) => false,
        }
    }
}

/// The setup parameters of `ResourceManager`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerParams {
    /// The number of slots, fixed for the lifetime of the manager.
    pub capacity: usize,
    /// The number of background loader threads. Loads run inline on the
    /// thread calling `update` if this is zero.
    pub workers: usize,
    /// The stack size of loader threads, or the platform default.
    pub stack_size: Option<usize>,
    /// The root directory of the default path resolver.
    pub content_root: String,
    /// Registers and requests the builtin catalog at construction.
    pub builtins: bool,
    pub notify: NotifyPolicy,
}

impl Default for ManagerParams {
    fn default() -> Self {
        ManagerParams {
            capacity: MAX_RESOURCES,
            workers: 2,
            stack_size: None,
            content_root: ".".into(),
            builtins: true,
            notify: NotifyPolicy::default(),
        }
    }
}

impl ManagerParams {
    /// Parses params from a JSON document. Absent fields keep their defaults.
    pub fn from_json<T: AsRef<str>>(json: T) -> Result<Self> {
        let params = serde_json::from_str(json.as_ref())?;
        Ok(params)
    }
}

/// A small string map of loading hints, e.g. `filter=nearest` or
/// `subdivisions=3`. Keys are unique; setting an existing key overrides it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadParams {
    pairs: SmallVec<[(InlinableString, InlinableString); 4]>,
}

impl LoadParams {
    #[inline]
    pub fn new() -> Self {
        LoadParams::default()
    }

    /// Builder flavour of `set`.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.set(key, value);
        self
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (key, value) = (key.as_ref(), value.as_ref());
        for v in &mut self.pairs {
            if v.0 == key {
                v.1 = value.into();
                return;
            }
        }

        self.pairs.push((key.into(), value.into()));
    }

    pub fn get<K: AsRef<str>>(&self, key: K) -> Option<&str> {
        let key = key.as_ref();
        self.pairs
            .iter()
            .find(|v| v.0 == key)
            .map(|v| v.1.as_ref())
    }

    /// Reads a boolean hint, accepting `true/false`, `yes/no`, `on/off` and `1/0`.
    pub fn get_bool<K: AsRef<str>>(&self, key: K) -> Option<bool> {
        match self.get(key)? {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            v => {
                warn!("[LoadParams] {:?} is not a boolean.", v);
                None
            }
        }
    }

    pub fn get_parsed<K, T>(&self, key: K) -> Option<T>
    where
        K: AsRef<str>,
        T: FromStr,
    {
        let key = key.as_ref();
        let v = self.get(key)?;
        match v.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("[LoadParams] could not parse {}={:?}.", key, v);
                None
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|v| (v.0.as_ref(), v.1.as_ref()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn load_params() {
        let mut params = LoadParams::new().with("filter", "nearest").with("n", "3");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("filter"), Some("nearest"));
        assert_eq!(params.get_parsed::<_, u32>("n"), Some(3));
        assert_eq!(params.get_parsed::<_, u32>("filter"), None);
        assert_eq!(params.get("missing"), None);

        params.set("filter", "linear");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("filter"), Some("linear"));

        params.set("mipmap", "on");
        assert_eq!(params.get_bool("mipmap"), Some(true));
        assert_eq!(params.get_bool("filter"), None);
    }

    #[test]
    fn manager_params() {
        let params = ManagerParams::from_json(r#"{ "capacity": 8, "notify": "Settled" }"#).unwrap();
        assert_eq!(params.capacity, 8);
        assert_eq!(params.notify, NotifyPolicy::Settled);
        assert_eq!(params.workers, 2);
        assert!(params.builtins);

        assert_eq!(ManagerParams::from_json("{}").unwrap(), ManagerParams::default());
        assert!(ManagerParams::from_json("{ capacity }").is_err());
    }

    #[test]
    fn notify_policy() {
        assert!(NotifyPolicy::LoadedOnly.notifies(Status::Loaded));
        assert!(!NotifyPolicy::LoadedOnly.notifies(Status::Error));
        assert!(NotifyPolicy::Settled.notifies(Status::Error));
        assert!(!NotifyPolicy::Settled.notifies(Status::Unloaded));
    }
}
