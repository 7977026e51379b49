//! End-to-end tests across the gateway, the Exhibit agent and its HTTP
//! collaborators.
