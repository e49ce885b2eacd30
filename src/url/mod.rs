//! URL policy for Sitewalk
//!
//! Pure functions deciding which discovered references are worth following:
//! hostname extraction, reference resolution, scheme filtering and the
//! same-domain test. Nothing here holds state.
//!
//! Scoping is checked twice. A bare relative reference is provisionally
//! in scope (it inherits the page it was found on), and the real hostname
//! comparison happens once it has been resolved to absolute form:
//!
//! ```
//! use sitewalk::url::{is_same_domain, resolve};
//!
//! let base = "https://example.test/blog/";
//! assert!(is_same_domain("../about", base));
//!
//! let absolute = resolve("../about", base).unwrap();
//! assert_eq!(absolute, "https://example.test/about");
//! assert!(is_same_domain(&absolute, "https://example.test/"));
//! assert!(!is_same_domain("https://other.test/x", base));
//! ```

mod domain;
mod resolve;

pub use domain::{hostname, is_same_domain};
pub use resolve::{is_http_scheme, resolve};

pub(crate) use resolve::{parse_reference, Reference};
