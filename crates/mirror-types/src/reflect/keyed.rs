//! Maps and sets keyed by type structure.
//!
//! Every key goes through [`to_canonical`] (or [`to_canonical_boxed`]) on the way in, so two
//! separately captured `List<?>` land on the same entry.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::marker::PhantomData;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::canonical::{to_canonical, to_canonical_boxed, CanonicalType};
use crate::{ReflectError, Result, Type, TypeEnv};

/// How keys are normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    #[default]
    Canonical,
    /// Primitive classes are keyed by their box class (`int` and `Integer` collide).
    Boxed,
}

impl KeyMode {
    fn key(self, env: &dyn TypeEnv, ty: &Type) -> Result<CanonicalType> {
        match self {
            KeyMode::Canonical => to_canonical(env, ty),
            KeyMode::Boxed => to_canonical_boxed(env, ty),
        }
    }
}

/// The map operations a [`TypeMap`] needs from its storage.
pub trait MapBacking<V> {
    fn len(&self) -> usize;
    fn insert(&mut self, key: CanonicalType, value: V) -> Option<V>;
    fn get(&self, key: &CanonicalType) -> Option<&V>;
    fn get_mut(&mut self, key: &CanonicalType) -> Option<&mut V>;
    fn remove(&mut self, key: &CanonicalType) -> Option<V>;
    fn clear(&mut self);
    fn retain(&mut self, keep: impl FnMut(&CanonicalType, &mut V) -> bool);
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a CanonicalType, &'a V)> + 'a
    where
        V: 'a;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The set operations a [`TypeSet`] needs from its storage.
pub trait SetBacking {
    fn len(&self) -> usize;
    fn insert(&mut self, key: CanonicalType) -> bool;
    fn contains(&self, key: &CanonicalType) -> bool;
    fn remove(&mut self, key: &CanonicalType) -> bool;
    fn clear(&mut self);
    fn retain(&mut self, keep: impl FnMut(&CanonicalType) -> bool);
    fn iter(&self) -> impl Iterator<Item = &CanonicalType> + '_;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! map_backing {
    ($map:ident, $remove:ident) => {
        impl<V> MapBacking<V> for $map<CanonicalType, V> {
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn insert(&mut self, key: CanonicalType, value: V) -> Option<V> {
                $map::insert(self, key, value)
            }

            fn get(&self, key: &CanonicalType) -> Option<&V> {
                $map::get(self, key)
            }

            fn get_mut(&mut self, key: &CanonicalType) -> Option<&mut V> {
                $map::get_mut(self, key)
            }

            fn remove(&mut self, key: &CanonicalType) -> Option<V> {
                $map::$remove(self, key)
            }

            fn clear(&mut self) {
                $map::clear(self)
            }

            fn retain(&mut self, keep: impl FnMut(&CanonicalType, &mut V) -> bool) {
                $map::retain(self, keep)
            }

            fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a CanonicalType, &'a V)> + 'a
            where
                V: 'a,
            {
                $map::iter(self)
            }
        }
    };
}

macro_rules! set_backing {
    ($set:ident, $remove:ident) => {
        impl SetBacking for $set<CanonicalType> {
            fn len(&self) -> usize {
                $set::len(self)
            }

            fn insert(&mut self, key: CanonicalType) -> bool {
                $set::insert(self, key)
            }

            fn contains(&self, key: &CanonicalType) -> bool {
                $set::contains(self, key)
            }

            fn remove(&mut self, key: &CanonicalType) -> bool {
                $set::$remove(self, key)
            }

            fn clear(&mut self) {
                $set::clear(self)
            }

            fn retain(&mut self, keep: impl FnMut(&CanonicalType) -> bool) {
                $set::retain(self, keep)
            }

            fn iter(&self) -> impl Iterator<Item = &CanonicalType> + '_ {
                $set::iter(self)
            }
        }
    };
}

map_backing!(HashMap, remove);
map_backing!(BTreeMap, remove);
map_backing!(IndexMap, shift_remove);
set_backing!(HashSet, remove);
set_backing!(BTreeSet, remove);
set_backing!(IndexSet, shift_remove);

/// A map from types to `V`, keyed by canonical form.
#[derive(Clone, Debug)]
pub struct TypeMap<V, B = HashMap<CanonicalType, V>> {
    backing: B,
    mode: KeyMode,
    _value: PhantomData<V>,
}

impl<V> TypeMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Self {
        Self {
            backing: HashMap::new(),
            mode: KeyMode::Boxed,
            _value: PhantomData,
        }
    }
}

impl<V> Default for TypeMap<V> {
    fn default() -> Self {
        Self {
            backing: HashMap::new(),
            mode: KeyMode::Canonical,
            _value: PhantomData,
        }
    }
}

impl<V, B: MapBacking<V>> TypeMap<V, B> {
    /// Wrap an existing, empty map. Entries already present would not have canonical keys.
    pub fn with_backing(backing: B) -> Result<Self> {
        Self::with_backing_and_mode(backing, KeyMode::Canonical)
    }

    pub fn with_backing_and_mode(backing: B, mode: KeyMode) -> Result<Self> {
        if !backing.is_empty() {
            return Err(ReflectError::invariant(format!(
                "keyed map backing must be empty, found {} entries",
                backing.len()
            )));
        }
        Ok(Self {
            backing,
            mode,
            _value: PhantomData,
        })
    }

    pub fn key_mode(&self) -> KeyMode {
        self.mode
    }

    /// The key `ty` is stored under.
    pub fn key(&self, env: &dyn TypeEnv, ty: &Type) -> Result<CanonicalType> {
        self.mode.key(env, ty)
    }

    pub fn insert(&mut self, env: &dyn TypeEnv, ty: &Type, value: V) -> Result<Option<V>> {
        let key = self.key(env, ty)?;
        Ok(self.backing.insert(key, value))
    }

    pub fn get(&self, env: &dyn TypeEnv, ty: &Type) -> Result<Option<&V>> {
        let key = self.key(env, ty)?;
        Ok(self.backing.get(&key))
    }

    pub fn get_mut(&mut self, env: &dyn TypeEnv, ty: &Type) -> Result<Option<&mut V>> {
        let key = self.key(env, ty)?;
        Ok(self.backing.get_mut(&key))
    }

    pub fn contains_key(&self, env: &dyn TypeEnv, ty: &Type) -> Result<bool> {
        Ok(self.get(env, ty)?.is_some())
    }

    pub fn remove(&mut self, env: &dyn TypeEnv, ty: &Type) -> Result<Option<V>> {
        let key = self.key(env, ty)?;
        Ok(self.backing.remove(&key))
    }

    /// Insert every pair; stops at the first key that cannot be canonicalized.
    pub fn extend<'t>(
        &mut self,
        env: &dyn TypeEnv,
        entries: impl IntoIterator<Item = (&'t Type, V)>,
    ) -> Result<()> {
        for (ty, value) in entries {
            self.insert(env, ty, value)?;
        }
        Ok(())
    }

    pub fn retain(&mut self, keep: impl FnMut(&CanonicalType, &mut V) -> bool) {
        self.backing.retain(keep)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalType, &V)> + '_ {
        self.backing.iter()
    }

    pub fn len(&self) -> usize {
        self.backing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backing.is_empty()
    }

    pub fn clear(&mut self) {
        self.backing.clear()
    }

    pub fn into_backing(self) -> B {
        self.backing
    }
}

/// A set of types, keyed by canonical form.
#[derive(Clone, Debug)]
pub struct TypeSet<B = HashSet<CanonicalType>> {
    backing: B,
    mode: KeyMode,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Self {
        Self {
            backing: HashSet::new(),
            mode: KeyMode::Boxed,
        }
    }
}

impl Default for TypeSet {
    fn default() -> Self {
        Self {
            backing: HashSet::new(),
            mode: KeyMode::Canonical,
        }
    }
}

impl<B: SetBacking> TypeSet<B> {
    pub fn with_backing(backing: B) -> Result<Self> {
        Self::with_backing_and_mode(backing, KeyMode::Canonical)
    }

    pub fn with_backing_and_mode(backing: B, mode: KeyMode) -> Result<Self> {
        if !backing.is_empty() {
            return Err(ReflectError::invariant(format!(
                "keyed set backing must be empty, found {} entries",
                backing.len()
            )));
        }
        Ok(Self { backing, mode })
    }

    pub fn key_mode(&self) -> KeyMode {
        self.mode
    }

    pub fn key(&self, env: &dyn TypeEnv, ty: &Type) -> Result<CanonicalType> {
        self.mode.key(env, ty)
    }

    /// `true` if the set did not already hold an equivalent type.
    pub fn insert(&mut self, env: &dyn TypeEnv, ty: &Type) -> Result<bool> {
        let key = self.key(env, ty)?;
        Ok(self.backing.insert(key))
    }

    pub fn contains(&self, env: &dyn TypeEnv, ty: &Type) -> Result<bool> {
        let key = self.key(env, ty)?;
        Ok(self.backing.contains(&key))
    }

    pub fn remove(&mut self, env: &dyn TypeEnv, ty: &Type) -> Result<bool> {
        let key = self.key(env, ty)?;
        Ok(self.backing.remove(&key))
    }

    pub fn extend<'t>(
        &mut self,
        env: &dyn TypeEnv,
        types: impl IntoIterator<Item = &'t Type>,
    ) -> Result<()> {
        for ty in types {
            self.insert(env, ty)?;
        }
        Ok(())
    }

    pub fn retain(&mut self, keep: impl FnMut(&CanonicalType) -> bool) {
        self.backing.retain(keep)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalType> + '_ {
        self.backing.iter()
    }

    pub fn len(&self) -> usize {
        self.backing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backing.is_empty()
    }

    pub fn clear(&mut self) {
        self.backing.clear()
    }

    pub fn into_backing(self) -> B {
        self.backing
    }
}
