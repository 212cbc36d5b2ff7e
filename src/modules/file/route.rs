use crate::modules::file::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/files")
            .service(upload_file)
            .service(list_audio_files)
            .service(list_other_files)
            .service(list_public_files)
            .service(update_file)
            .service(delete_file),
    );
}
