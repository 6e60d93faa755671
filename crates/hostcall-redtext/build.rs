//! Linker arguments for loading as a CPython extension module.

fn main() {
    pyo3_build_config::add_extension_module_link_args();
}
