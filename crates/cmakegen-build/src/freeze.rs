//! Canonical, hashable forms of compiler configurations.
//!
//! A [`ParsedConfig`] holds collections whose equality semantics differ:
//! option order is significant, define order is not. [`Freeze`] maps any
//! value onto [`Frozen`], a closed structural form with native `Eq`, `Ord`
//! and `Hash`, so that two configurations are equal exactly when their
//! frozen forms are.
//!
//! The transform is defined over four kinds:
//!
//! - mapping: a set of `[key, value]` pairs
//! - ordered sequence: a sequence
//! - set: a set
//! - scalar: itself

use indexmap::IndexMap;
use smol_str::SmolStr;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use crate::command::{DefineValue, ParsedConfig};

/// A deeply immutable, totally ordered value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frozen {
    Bool(bool),
    Str(SmolStr),
    Path(PathBuf),
    Seq(Vec<Frozen>),
    Set(BTreeSet<Frozen>),
}

impl Frozen {
    /// Freeze items as an ordered sequence.
    pub fn seq<'a, T, I>(items: I) -> Frozen
    where
        T: Freeze + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Frozen::Seq(items.into_iter().map(Freeze::freeze).collect())
    }

    /// Freeze items as an unordered set.
    pub fn set<'a, T, I>(items: I) -> Frozen
    where
        T: Freeze + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Frozen::Set(items.into_iter().map(Freeze::freeze).collect())
    }

    /// Freeze key/value pairs as a mapping.
    pub fn map<'a, K, V, I>(entries: I) -> Frozen
    where
        K: Freeze + ?Sized + 'a,
        V: Freeze + ?Sized + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        Frozen::Set(
            entries
                .into_iter()
                .map(|(k, v)| Frozen::Seq(vec![k.freeze(), v.freeze()]))
                .collect(),
        )
    }

    /// Look up `key` in a frozen mapping.
    pub fn get(&self, key: &str) -> Option<&Frozen> {
        let Frozen::Set(pairs) = self else {
            return None;
        };
        pairs.iter().find_map(|pair| match pair {
            Frozen::Seq(kv) if kv.len() == 2 && kv[0].as_str() == Some(key) => Some(&kv[1]),
            _ => None,
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Frozen::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Children of a sequence or set, in their stored order.
    pub fn children(&self) -> Vec<&Frozen> {
        match self {
            Frozen::Seq(items) => items.iter().collect(),
            Frozen::Set(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Conversion into a [`Frozen`] value.
pub trait Freeze {
    fn freeze(&self) -> Frozen;
}

impl Freeze for Frozen {
    fn freeze(&self) -> Frozen {
        self.clone()
    }
}

impl Freeze for bool {
    fn freeze(&self) -> Frozen {
        Frozen::Bool(*self)
    }
}

impl Freeze for str {
    fn freeze(&self) -> Frozen {
        Frozen::Str(SmolStr::new(self))
    }
}

impl Freeze for String {
    fn freeze(&self) -> Frozen {
        self.as_str().freeze()
    }
}

impl Freeze for SmolStr {
    fn freeze(&self) -> Frozen {
        Frozen::Str(self.clone())
    }
}

impl Freeze for Path {
    fn freeze(&self) -> Frozen {
        Frozen::Path(self.to_path_buf())
    }
}

impl Freeze for PathBuf {
    fn freeze(&self) -> Frozen {
        self.as_path().freeze()
    }
}

impl<T: Freeze> Freeze for [T] {
    fn freeze(&self) -> Frozen {
        Frozen::seq(self)
    }
}

impl<T: Freeze> Freeze for Vec<T> {
    fn freeze(&self) -> Frozen {
        self.as_slice().freeze()
    }
}

impl<T: Freeze> Freeze for BTreeSet<T> {
    fn freeze(&self) -> Frozen {
        Frozen::set(self)
    }
}

impl<K: Freeze, V: Freeze> Freeze for BTreeMap<K, V> {
    fn freeze(&self) -> Frozen {
        Frozen::map(self)
    }
}

impl<K: Freeze, V: Freeze, S: BuildHasher> Freeze for IndexMap<K, V, S> {
    fn freeze(&self) -> Frozen {
        Frozen::map(self)
    }
}

impl Freeze for DefineValue {
    fn freeze(&self) -> Frozen {
        match self {
            DefineValue::Flag => Frozen::Bool(true),
            DefineValue::Value(v) => v.freeze(),
        }
    }
}

impl Freeze for ParsedConfig {
    fn freeze(&self) -> Frozen {
        // `includes` is an ordered set: search order is significant.
        let fields: [(&str, Frozen); 4] = [
            ("options", self.options.freeze()),
            ("defines", self.defines.freeze()),
            ("includes", Frozen::seq(&self.includes)),
            ("system_includes", self.system_includes.freeze()),
        ];
        Frozen::map(fields.iter().map(|(k, v)| (*k, v)))
    }
}

/// Grouping key for a configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalConfig(Frozen);

impl CanonicalConfig {
    pub fn new(config: &ParsedConfig) -> Self {
        CanonicalConfig(config.freeze())
    }

    pub fn as_frozen(&self) -> &Frozen {
        &self.0
    }

    /// A top-level field of the configuration.
    pub fn field(&self, name: &str) -> Option<&Frozen> {
        self.0.get(name)
    }
}

impl From<&ParsedConfig> for CanonicalConfig {
    fn from(config: &ParsedConfig) -> Self {
        CanonicalConfig::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command;

    fn canon(cmd: &str) -> CanonicalConfig {
        CanonicalConfig::new(&parse_command(cmd, "/proj").unwrap())
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let config = parse_command("cc -Wall -Iinc -DA=1 -isystem /sys", "/proj").unwrap();
        let once = config.freeze();
        assert_eq!(once.freeze(), once);
        assert_eq!(CanonicalConfig::new(&config), CanonicalConfig::new(&config));
    }

    #[test]
    fn test_define_order_is_irrelevant() {
        assert_eq!(canon("cc -DA -DB=2 -DC"), canon("cc -DC -DB=2 -DA"));
    }

    #[test]
    fn test_interleaving_is_irrelevant() {
        assert_eq!(
            canon("cc -Wall -Iinc -DFOO -O2 -Isrc"),
            canon("cc -DFOO -Wall -Iinc -Isrc -O2")
        );
    }

    #[test]
    fn test_option_order_matters() {
        assert_ne!(canon("cc -fno-rtti -fPIC"), canon("cc -fPIC -fno-rtti"));
    }

    #[test]
    fn test_include_order_matters() {
        assert_ne!(canon("cc -Ia -Ib"), canon("cc -Ib -Ia"));
    }

    #[test]
    fn test_define_value_matters() {
        assert_ne!(canon("cc -DVERSION=2"), canon("cc -DVERSION=3"));
        assert_ne!(canon("cc -DA"), canon("cc -DA=1"));
    }

    #[test]
    fn test_system_marking_matters() {
        assert_ne!(canon("cc -I/usr/inc"), canon("cc -isystem /usr/inc"));
    }

    #[test]
    fn test_flag_define_is_not_string_true() {
        // The no-value sentinel must not collide with any string value.
        assert_ne!(canon("cc -DA"), canon("cc -DA=true"));
    }

    #[test]
    fn test_field_lookup() {
        let key = canon("cc -g -DX -Iinc");
        let options = key.field("options").unwrap();
        assert_eq!(options, &Frozen::Seq(vec![Frozen::Str("-g".into())]));
        assert!(key.field("missing").is_none());
    }

    #[test]
    fn test_system_includes_subset_of_includes() {
        let key = canon("cc -Ia -isystem b -isystem a -Ic");
        let includes = key.field("includes").unwrap().children();
        for system in key.field("system_includes").unwrap().children() {
            assert!(includes.contains(&system));
        }
    }

    #[test]
    fn test_generic_nested_structures() {
        let mut inner = BTreeMap::new();
        inner.insert("k".to_string(), vec![true, false]);
        let mut a = BTreeMap::new();
        a.insert("outer".to_string(), inner.clone());
        let mut b = BTreeMap::new();
        b.insert("outer".to_string(), inner);
        assert_eq!(a.freeze(), b.freeze());
    }
}
