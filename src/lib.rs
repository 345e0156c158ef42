// Wasabi skin descriptor interpreter
//
//  This file is part of Wasabi.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Interpreter for Wasabi skin descriptors.
//!
//! A skin is a packaged bundle of XML descriptor documents,
//!   images,
//!   and compiled scripts.
//! This crate reads the descriptors out of an [`archive`] and assembles
//!   the object graph that a renderer or script host would consume;
//!     it does not itself render anything or execute scripts.
//!
//! See [`skin`] to get started.

// We build docs for private items.
#![allow(rustdoc::private_intra_doc_links)]

pub mod archive;
pub mod diagnose;
pub mod skin;
pub mod span;
pub mod xml;
