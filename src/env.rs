use std::collections::HashMap;

use generational_arena::{Arena, Index};

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// One lexical scope. The link to the enclosing scope is an arena index, so
/// a scope never owns its parent.
#[derive(Debug, Default)]
pub struct Environment {
    enclosing: Option<Index>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn enclosing(&self) -> Option<Index> {
        self.enclosing
    }

    /// Declares `name` directly in this scope. Fails if this scope (not an
    /// enclosing one) already has it.
    pub fn declare(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(name.lexeme) {
            return Err(RuntimeError::new(
                name,
                format!("Variable with name '{}' already exists", name.lexeme),
            ));
        }
        self.values.insert(name.lexeme.to_owned(), value);
        Ok(())
    }

    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_local_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }
}

/// Owns every live scope. The global scope is created up front and lives as
/// long as this value; block scopes are created with `enclose` and dropped
/// with `discard` once the block is done.
#[derive(Debug)]
pub struct Scopes {
    arena: Arena<Environment>,
    global: Index,
}

impl Default for Scopes {
    fn default() -> Self {
        let mut arena = Arena::new();
        let global = arena.insert(Environment::default());
        Scopes { arena, global }
    }
}

impl Scopes {
    pub fn global(&self) -> Index {
        self.global
    }

    /// Number of live scopes, the global one included.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Creates a child scope of `parent`.
    pub fn enclose(&mut self, parent: Index) -> Index {
        self.arena.insert(Environment {
            enclosing: Some(parent),
            ..Default::default()
        })
    }

    /// Drops a block scope. The global scope is never dropped.
    pub fn discard(&mut self, scope: Index) {
        if scope != self.global {
            self.arena.remove(scope);
        }
    }

    pub fn declare(&mut self, scope: Index, name: &Token, value: Value) -> Result<(), RuntimeError> {
        match self.arena.get_mut(scope) {
            Some(env) => env.declare(name, value),
            None => Err(dropped_scope(name)),
        }
    }

    /// Looks `name` up in `scope`, then outward through enclosing scopes.
    pub fn get(&self, scope: Index, name: &Token) -> Result<Value, RuntimeError> {
        let mut current = Some(scope);
        while let Some(index) = current {
            let env = self.arena.get(index).ok_or_else(|| dropped_scope(name))?;
            if let Some(value) = env.get_local(name.lexeme) {
                return Ok(value.clone());
            }
            current = env.enclosing();
        }
        Err(undefined(name))
    }

    /// Overwrites the nearest existing binding of `name`. Never creates one.
    pub fn assign(&mut self, scope: Index, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut current = Some(scope);
        while let Some(index) = current {
            let env = self
                .arena
                .get_mut(index)
                .ok_or_else(|| dropped_scope(name))?;
            if let Some(slot) = env.get_local_mut(name.lexeme) {
                *slot = value;
                return Ok(());
            }
            current = env.enclosing();
        }
        Err(undefined(name))
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::new(name, format!("Undefined variable '{}'", name.lexeme))
}

fn dropped_scope(name: &Token) -> RuntimeError {
    RuntimeError::new(
        name,
        format!("Scope for '{}' is no longer alive", name.lexeme),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::Identifier, name, 1)
    }

    #[test]
    fn declare_then_get() {
        let mut scopes = Scopes::default();
        let global = scopes.global();
        scopes
            .declare(global, &ident("a"), Value::Number(1.0))
            .unwrap();
        assert_eq!(scopes.get(global, &ident("a")), Ok(Value::Number(1.0)));
    }

    #[test]
    fn redeclaring_in_same_scope_fails() {
        let mut scopes = Scopes::default();
        let global = scopes.global();
        scopes.declare(global, &ident("a"), Value::Nil).unwrap();
        let err = scopes
            .declare(global, &ident("a"), Value::Nil)
            .unwrap_err();
        assert_eq!(err.message, "Variable with name 'a' already exists");
    }

    #[test]
    fn shadowing_in_child_scope_is_allowed() {
        let mut scopes = Scopes::default();
        let global = scopes.global();
        scopes
            .declare(global, &ident("a"), Value::Number(1.0))
            .unwrap();
        let child = scopes.enclose(global);
        scopes
            .declare(child, &ident("a"), Value::Number(2.0))
            .unwrap();
        assert_eq!(scopes.get(child, &ident("a")), Ok(Value::Number(2.0)));
        assert_eq!(scopes.get(global, &ident("a")), Ok(Value::Number(1.0)));
    }

    #[test]
    fn lookup_walks_the_chain() {
        let mut scopes = Scopes::default();
        let global = scopes.global();
        scopes
            .declare(global, &ident("a"), Value::Bool(true))
            .unwrap();
        let child = scopes.enclose(global);
        let grandchild = scopes.enclose(child);
        assert_eq!(scopes.get(grandchild, &ident("a")), Ok(Value::Bool(true)));
    }

    #[test]
    fn assign_writes_nearest_binding() {
        let mut scopes = Scopes::default();
        let global = scopes.global();
        scopes
            .declare(global, &ident("a"), Value::Number(1.0))
            .unwrap();
        let child = scopes.enclose(global);
        scopes
            .assign(child, &ident("a"), Value::Number(5.0))
            .unwrap();
        assert_eq!(scopes.get(global, &ident("a")), Ok(Value::Number(5.0)));
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut scopes = Scopes::default();
        let global = scopes.global();
        let err = scopes
            .assign(global, &ident("nope"), Value::Nil)
            .unwrap_err();
        assert_eq!(err.message, "Undefined variable 'nope'");
        assert!(scopes.get(global, &ident("nope")).is_err());
    }

    #[test]
    fn discarded_scope_takes_its_bindings() {
        let mut scopes = Scopes::default();
        let global = scopes.global();
        let child = scopes.enclose(global);
        scopes.declare(child, &ident("a"), Value::Nil).unwrap();
        scopes.discard(child);
        assert_eq!(scopes.len(), 1);
        assert!(scopes.get(global, &ident("a")).is_err());

        scopes.discard(global);
        assert_eq!(scopes.len(), 1);
    }
}
