//! Action type registry.
//!
//! Built once at startup through [`RegistryBuilder`], then frozen into an
//! immutable [`ActionTypeRegistry`] that request handlers share by `Arc`.
//! There is no way to add a type after `build()`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::{ActionType, DynActionType};
use crate::error::{Result, UndoError};

#[derive(Default)]
pub struct RegistryBuilder {
    types: BTreeMap<&'static str, Arc<dyn DynActionType>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed action under its `TYPE` key.
    pub fn register<T: ActionType>(&mut self, action: T) -> Result<&mut Self> {
        self.register_dyn(Arc::new(action))
    }

    /// Register an already type-erased action.
    ///
    /// Fails with `DuplicateType` if the key is already bound.
    pub fn register_dyn(&mut self, action: Arc<dyn DynActionType>) -> Result<&mut Self> {
        let key = action.type_key();
        if self.types.contains_key(key) {
            return Err(UndoError::DuplicateType(key.to_string()));
        }
        self.types.insert(key, action);
        Ok(self)
    }

    pub fn build(self) -> Arc<ActionTypeRegistry> {
        Arc::new(ActionTypeRegistry { types: self.types })
    }
}

pub struct ActionTypeRegistry {
    types: BTreeMap<&'static str, Arc<dyn DynActionType>>,
}

impl ActionTypeRegistry {
    /// Fails with `UnknownType` if nothing is registered under `type_key`.
    pub fn lookup(&self, type_key: &str) -> Result<&Arc<dyn DynActionType>> {
        self.types
            .get(type_key)
            .ok_or_else(|| UndoError::UnknownType(type_key.to_string()))
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.types.contains_key(type_key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for ActionTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTypeRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionContext, Applied};
    use crate::error::ActionError;
    use crate::scope::Scope;

    struct Ping;

    impl ActionType for Ping {
        const TYPE: &'static str = "ping";
        type Params = u64;
        type Output = ();
        type Reversal = ();

        fn scope(&self, params: &u64) -> Scope {
            Scope::new("ping", params)
        }

        fn apply(
            &self,
            _ctx: &ActionContext<'_>,
            _params: &u64,
        ) -> std::result::Result<Applied<(), ()>, ActionError> {
            Ok(Applied::new((), ()))
        }

        fn undo(
            &self,
            _ctx: &ActionContext<'_>,
            _params: &u64,
            _reversal: &(),
        ) -> std::result::Result<(), ActionError> {
            Ok(())
        }

        fn redo(
            &self,
            _ctx: &ActionContext<'_>,
            _params: &u64,
            _reversal: &(),
        ) -> std::result::Result<Applied<(), ()>, ActionError> {
            Ok(Applied::new((), ()))
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut builder = RegistryBuilder::new();
        builder.register(Ping).unwrap();
        let registry = builder.build();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("ping"));
        let ping = registry.lookup("ping").unwrap();
        assert_eq!(ping.type_key(), "ping");
        assert_eq!(
            ping.scope_of(&serde_json::json!(5)).unwrap(),
            Scope::new("ping", 5)
        );
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut builder = RegistryBuilder::new();
        builder.register(Ping).unwrap();
        let err = builder.register(Ping).err().unwrap();
        assert!(matches!(err, UndoError::DuplicateType(ref k) if k == "ping"));
    }

    #[test]
    fn unknown_lookup_fails() {
        let registry = RegistryBuilder::new().build();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.lookup("nope"),
            Err(UndoError::UnknownType(ref k)) if k == "nope"
        ));
    }

    #[test]
    fn bad_params_are_reported_against_the_type() {
        let mut builder = RegistryBuilder::new();
        builder.register(Ping).unwrap();
        let registry = builder.build();
        let err = registry
            .lookup("ping")
            .unwrap()
            .scope_of(&serde_json::json!("not a number"))
            .unwrap_err();
        assert!(matches!(err, UndoError::InvalidParams { ref type_key, .. } if type_key == "ping"));
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        let mut builder = RegistryBuilder::new();
        builder.register(Ping).unwrap();
        let registry = builder.build();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.lookup("ping").is_ok())
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }
}
