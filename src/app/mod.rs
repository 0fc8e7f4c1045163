// Copyright 2024-2025 hrzlgnm
// SPDX-License-Identifier: MIT-0

mod api;
mod fetch;
mod icons;
mod login;
mod macros;
pub mod main;
mod readings_table;
mod router;
mod sensor;
mod session;
mod settings;
mod station;
mod stations;
mod storage;
mod theme_switcher;
mod widgets;
