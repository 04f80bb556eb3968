#[cfg(test)]
mod integration_tests {
    use crate::backends::wasm::ModuleRef;
    use crate::config::load_and_validate_config;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// The sample config shipped with the repository must stay loadable.
    #[test]
    fn test_sample_toolbox_yaml_loading() {
        let config = load_and_validate_config("configs/toolbox.yaml").unwrap();

        assert_eq!(
            config.modules.path_for(ModuleRef::Ghostscript),
            Path::new("assets/gs.wasm")
        );
        assert_eq!(
            config.modules.path_for(ModuleRef::Pdfcpu),
            Path::new("assets/pdfcpu.wasm")
        );
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.status.progress_interval(), Duration::from_millis(30));
        assert_eq!(config.wasm.fuel.effective_limit(), None);
    }
}
