pub mod datos_step;
pub mod grupo_step;
pub mod machu_step;
pub mod programas_step;
pub mod transporte_step;
pub mod turistas_step;

pub use datos_step::{DatosPayload, DatosStep};
pub use grupo_step::{GrupoInput, GrupoPayload, GrupoStep};
pub use machu_step::{DetalleMachuEntrada, MachuPayload, MachuStep};
pub use programas_step::{ProgramaEntrada, ProgramasPayload, ProgramasStep};
pub use transporte_step::{RecojoEntrada, TransportePayload, TransporteStep};
pub use turistas_step::{TuristaEntrada, TuristasPayload, TuristasStep};
