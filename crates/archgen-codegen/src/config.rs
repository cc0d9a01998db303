use std::path::{Path, PathBuf};

/// Where generated sources go and what they refer to.
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Directory receiving the generated tree.
    pub out_dir: PathBuf,

    /// Module path of `out_dir` inside the crate, used for `use` paths
    /// between generated units.
    pub generated_module: String,

    /// Path of the crate providing `Row`, `Value` and the other runtime
    /// types named by generated code.
    pub runtime: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("src/generated"),
            generated_module: "generated".to_string(),
            runtime: "archgen_runtime".to_string(),
        }
    }
}

impl GenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn out_dir(mut self, out_dir: impl AsRef<Path>) -> Self {
        self.out_dir = out_dir.as_ref().to_path_buf();
        self
    }

    pub fn generated_module(mut self, module: impl Into<String>) -> Self {
        self.generated_module = module.into();
        self
    }

    pub fn runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// `crate::<generated_module>`
    pub(crate) fn generated_root(&self) -> String {
        let module = self.generated_module.trim_start_matches("crate::");
        if module.is_empty() {
            "crate".to_string()
        } else {
            format!("crate::{module}")
        }
    }
}
