//! Domain layer containing business entities and the click pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`probe`] - Destination reachability contract
//! - [`click_event`] - Click tracking event model
//! - [`click_queue`] - Bounded drop-on-full event queue
//! - [`click_worker`] - Fixed pool of click persistence workers
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves the short code and builds a [`click_event::ClickEvent`]
//! 2. The event is offered to [`click_queue::ClickQueue`] without blocking
//! 3. One of the [`click_worker::ClickWorkerPool`] workers dequeues it
//! 4. Click data is persisted via [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_queue;
pub mod click_worker;
pub mod entities;
pub mod probe;
pub mod repositories;
