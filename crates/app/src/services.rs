//! Services — stateless façades over the transport.
//!
//! Each service accepts a port implementation via a generic parameter
//! (constructor injection), keeping this layer decoupled from concrete
//! transports. Services neither cache, retry nor time out.

pub mod auth_service;
pub mod entity_service;

pub use auth_service::AuthService;
pub use entity_service::{
    AlertButtonService, BarrelService, EntityService, TeamService, UserService,
};
