//! Built-in protocol encoders, one module per receiver family.
//!
//! | Model          | Data bits | Symbols | Checksum                    |
//! |----------------|-----------|---------|-----------------------------|
//! | Petrainer      | 40        | 42      | per-method constant byte    |
//! | Petrainer998DR | 40        | 42      | reversed/inverted nibbles   |
//! | CaiXianlin     | 42        | 43      | byte sum                    |
//! | T330           | 41        | 43      | split type byte + channel   |
//! | D80            | 40        | 42      | byte sum                    |

pub mod caixianlin;
pub mod d80;
pub mod petrainer;
pub mod petrainer998dr;
pub mod t330;

pub use caixianlin::CaiXianlin;
pub use d80::D80;
pub use petrainer::Petrainer;
pub use petrainer998dr::Petrainer998DR;
pub use t330::T330;
