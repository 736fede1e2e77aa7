#![forbid(unsafe_code)]

/// `embed_migrations!` is not re-run when only the migration files change,
/// so the crate is rebuilt whenever the migration directory is touched.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
