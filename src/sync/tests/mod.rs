//! Unit tests for the synchronisation domain and services.
