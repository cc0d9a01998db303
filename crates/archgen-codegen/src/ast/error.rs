use archgen_core::Error;
use std::path::Path;

#[derive(Debug)]
pub(super) struct ErrorSet {
    errors: Vec<syn::Error>,
}

impl ErrorSet {
    pub(super) fn new() -> Self {
        Self { errors: vec![] }
    }

    pub(super) fn push(&mut self, err: syn::Error) {
        self.errors.push(err);
    }

    pub(super) fn collect(self) -> Option<syn::Error> {
        self.errors.into_iter().reduce(|mut acc, err| {
            acc.combine(err);
            acc
        })
    }

    /// Fails with every collected message, each prefixed by its location in
    /// `file`.
    pub(super) fn into_result(self, file: &Path) -> archgen_core::Result<()> {
        let Some(err) = self.collect() else {
            return Ok(());
        };

        let messages: Vec<_> = err
            .into_iter()
            .map(|err| {
                let start = err.span().start();
                format!(
                    "{}:{}:{}: {err}",
                    file.display(),
                    start.line,
                    start.column + 1
                )
            })
            .collect();

        Err(Error::from_args(format_args!("{}", messages.join("\n"))))
    }
}
