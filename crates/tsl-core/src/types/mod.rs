mod certificate;
mod key;
mod provider;

pub use certificate::*;
pub use key::*;
pub use provider::*;
