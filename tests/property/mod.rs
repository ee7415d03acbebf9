// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module

mod column_merge;
mod request_properties;
