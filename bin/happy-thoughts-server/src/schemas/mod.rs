//! Wire-level request / response types.

pub mod thought;
