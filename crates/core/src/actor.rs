//! The person on whose behalf a write is made.
//!
//! Every ledger and registry write takes an [`Actor`] supplied by the caller's session
//! context; the core never assumes a logged-in user.

use crate::error::{StoreError, StoreResult};
use std::fmt;
use ward_types::NonEmptyText;

/// Represents the clinician or clerk performing an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    /// The full name of the actor.
    pub name: NonEmptyText,

    /// The professional role of the actor (e.g., "Obstetrician", "Nurse").
    pub role: NonEmptyText,

    /// Professional registration, if the actor has one.
    pub registration: Option<ActorRegistration>,
}

/// A declared professional registration, e.g. `CRM 12345-SP`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ActorRegistration {
    pub authority: NonEmptyText,
    pub number: NonEmptyText,
}

impl ActorRegistration {
    pub fn new(authority: impl Into<String>, number: impl Into<String>) -> StoreResult<Self> {
        let authority_str = authority.into().trim().to_string();
        let number_str = number.into().trim().to_string();

        if authority_str.chars().any(char::is_whitespace)
            || number_str.chars().any(char::is_whitespace)
        {
            return Err(StoreError::InvalidInput(
                "registration authority and number must not contain whitespace".into(),
            ));
        }

        Ok(Self {
            authority: NonEmptyText::new(authority_str)?,
            number: NonEmptyText::new(number_str)?,
        })
    }

    /// Parses the `"<authority> <number>"` form, e.g. `"CRM 12345-SP"`.
    pub fn parse(input: &str) -> StoreResult<Self> {
        let mut parts = input.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(authority), Some(number), None) => Self::new(authority, number),
            _ => Err(StoreError::InvalidInput(format!(
                "registration must look like '<authority> <number>', got '{input}'"
            ))),
        }
    }
}

impl fmt::Display for ActorRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.authority, self.number)
    }
}

impl Actor {
    pub fn new(name: impl AsRef<str>, role: impl AsRef<str>) -> StoreResult<Self> {
        Ok(Self {
            name: NonEmptyText::new(name)?,
            role: NonEmptyText::new(role)?,
            registration: None,
        })
    }

    pub fn with_registration(mut self, registration: ActorRegistration) -> Self {
        self.registration = Some(registration);
        self
    }

    /// Attribution text stored on records, e.g. `Dr. Ana (Neonatologist, CRM 45678-SP)`.
    pub fn attribution(&self) -> String {
        match &self.registration {
            Some(reg) => format!("{} ({}, {})", self.name, self.role, reg),
            None => format!("{} ({})", self.name, self.role),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}
