//! # Repository Module
//!
//! Database repository implementations for the Dukaan back-office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.customers().find_by_identity(&identity)                    │
//! │       ▼                                                                 │
//! │  CustomerRepository                                                    │
//! │  ├── find_by_identity(&self, identity)                                 │
//! │  ├── register(&self, customer)                                         │
//! │  └── update(&self, customer)                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories cover single-collection reads/writes. Multi-step sequences
//! with transaction boundaries (resolve+adjust, revert+reapply stock,
//! read-max+insert invoice numbers) live in [`crate::service`].

pub mod category;
pub mod customer;
pub mod expense;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod salesman;
pub mod user;
pub mod vendor;
