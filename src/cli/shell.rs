//! Line-oriented interactive session.
//!
//! The session owns one [`RestApiBuilder`] and the destination directory; each
//! command reads or updates them. Nothing is global, so a test can drive a
//! session over in-memory buffers.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::generator::naming::package_name;
use crate::generator::GenerateOptions;
use crate::runtime_config::RuntimeConfig;
use crate::spec::{Endpoint, RestApiBuilder};

const PROMPT: &str = ">>> ";

const HELP: &str = "Commands:
  config    set the service name and destination directory
  add       add an endpoint
  show      show the current configuration
  run       generate service.go and handler.go
  help      show this help
  exit      leave the shell";

/// One interactive session over a reader/writer pair.
pub struct Session<R, W> {
    input: R,
    output: W,
    runtime: RuntimeConfig,
    builder: RestApiBuilder,
    directory: Option<PathBuf>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, runtime: RuntimeConfig) -> Self {
        Session {
            input,
            output,
            runtime,
            builder: RestApiBuilder::new(),
            directory: None,
        }
    }

    /// Accumulated description.
    pub fn builder(&self) -> &RestApiBuilder {
        &self.builder
    }

    /// Destination chosen with `config`, if any.
    pub fn directory(&self) -> Option<&PathBuf> {
        self.directory.as_ref()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read commands until `exit` or end of input.
    ///
    /// Generation errors are printed and the session continues; only I/O
    /// errors on the session's own streams end it early.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "genapi {}", env!("CARGO_PKG_VERSION"))?;
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                return Ok(());
            };
            match line.as_str() {
                "" => {}
                "config" => self.config()?,
                "add" => self.add()?,
                "show" => self.show()?,
                "run" => self.generate()?,
                "help" => writeln!(self.output, "{HELP}")?,
                "exit" | "quit" => return Ok(()),
                other => writeln!(self.output, "unknown command {other:?}, try help")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    fn config(&mut self) -> io::Result<()> {
        writeln!(self.output, "Configure service")?;
        let name = self.ask("Service name")?;
        let dir = self.ask("Destination directory")?;
        self.builder.set_service_name(name);
        self.directory = (!dir.is_empty()).then(|| PathBuf::from(dir));
        Ok(())
    }

    fn add(&mut self) -> io::Result<()> {
        writeln!(self.output, "Add an endpoint")?;
        let name = self.ask("Name")?;
        let url = self.ask("URL")?;
        let method = self.ask("Method")?;
        let endpoint = Endpoint::new(name, url, method);
        writeln!(self.output, "Adding {endpoint}")?;
        self.builder.add_endpoint(endpoint);
        Ok(())
    }

    fn show(&mut self) -> io::Result<()> {
        let service = self.builder.current_service_name().to_string();
        let dir = self.destination();
        writeln!(self.output, "Service:   {service}")?;
        writeln!(self.output, "Directory: {}", dir.display())?;
        writeln!(self.output, "Endpoints: {}", self.builder.endpoints().len())?;
        for endpoint in self.builder.endpoints() {
            writeln!(self.output, "  {endpoint}")?;
        }
        Ok(())
    }

    fn generate(&mut self) -> io::Result<()> {
        let api = self.builder.build();
        let options = GenerateOptions::new(self.destination())
            .with_formatter(self.runtime.formatter)
            .with_gofmt_bin(&self.runtime.gofmt_bin);
        match api.generate(&options) {
            Ok(project) => {
                writeln!(self.output, "Generated {}", project.service_path.display())?;
                writeln!(self.output, "Generated {}", project.handler_path.display())?;
            }
            Err(e) => writeln!(self.output, "ERROR: {e}")?,
        }
        Ok(())
    }

    fn destination(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(package_name(self.builder.current_service_name())))
    }
}
