//! # Route Modules
//!
//! | Prefix                                       | Module             |
//! |----------------------------------------------|--------------------|
//! | `/v1/producers`                              | [`producers`]      |
//! | `/v1/producers/{producer_id}/properties`     | [`properties`]     |
//! | `/v1/producers/{producer_id}/crop-seasons`   | [`crop_seasons`]   |

pub mod crop_seasons;
pub mod producers;
pub mod properties;
