//! Printing records, as text or JSON

use anyhow::Result;
use bankoffice_core::{Account, Card, Transaction, User};
use serde::Serialize;
use std::fmt::Display;
use uuid::Uuid;

/// Anything the CLI prints: an id column plus its Display form
pub trait Record: Serialize + Display {
    fn id(&self) -> Uuid;
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Card {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

pub fn one<T: Record>(json: bool, item: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}  {}", item.id(), item);
    }
    Ok(())
}

pub fn many<T: Record>(json: bool, items: &[T], empty: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("{}", empty);
    } else {
        for item in items {
            println!("{}  {}", item.id(), item);
        }
    }
    Ok(())
}
