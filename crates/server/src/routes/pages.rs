//! Informational pages. Their content ships with the binary.

use crate::dtos::page::{PageResponse, SectionResponse};
use axum::Json;

struct Page {
    slug: &'static str,
    title: &'static str,
    sections: &'static [(&'static str, &'static str)],
}

const HOME: Page = Page {
    slug: "home",
    title: "FIME-NET",
    sections: &[
        (
            "Tu comunidad en la FIME",
            "Conoce a tus profesores, consulta las materias de cada semestre y comparte tu experiencia con otros estudiantes.",
        ),
        (
            "Directorio de profesores",
            "Busca profesores por nombre, revisa las materias que imparten y lee las reseñas de quienes ya tomaron clase con ellos.",
        ),
        (
            "Reseñas honestas",
            "Califica a tus profesores de 1 a 5 estrellas y deja un comentario. Puedes publicar de forma anónima.",
        ),
    ],
};

const ABOUT: Page = Page {
    slug: "about",
    title: "Acerca de FIME-NET",
    sections: &[
        (
            "Quiénes somos",
            "FIME-NET es un proyecto hecho por estudiantes para estudiantes de la Facultad de Ingeniería Mecánica y Eléctrica.",
        ),
        (
            "Nuestra misión",
            "Ayudar a cada estudiante a planear su carga académica con información clara sobre materias y profesores.",
        ),
    ],
};

const COMMUNITY: Page = Page {
    slug: "community",
    title: "Comunidad",
    sections: &[
        (
            "Participa",
            "Crea una cuenta con tu correo, confirma tu dirección y empieza a compartir reseñas.",
        ),
        (
            "Reglas de convivencia",
            "Sé respetuoso. Las reseñas deben hablar de la experiencia en clase, nunca de la vida personal de nadie.",
        ),
    ],
};

const FAQ: Page = Page {
    slug: "faq",
    title: "Preguntas frecuentes",
    sections: &[
        (
            "¿Mis reseñas anónimas muestran mi nombre?",
            "No. Una reseña anónima no muestra tu nombre ni ningún dato que te identifique.",
        ),
        (
            "¿Puedo reseñar al mismo profesor varias veces?",
            "Puedes dejar una reseña por materia y semestre para cada profesor.",
        ),
        (
            "¿Por qué no encuentro a un profesor?",
            "El directorio solo muestra profesores activos. Si falta alguien, escríbenos para darlo de alta.",
        ),
    ],
};

const TERMS: Page = Page {
    slug: "terms",
    title: "Términos y condiciones",
    sections: &[
        (
            "Uso del servicio",
            "Al usar FIME-NET aceptas publicar contenido veraz y respetuoso. Podemos retirar contenido que incumpla estas reglas.",
        ),
        (
            "Datos personales",
            "Guardamos tu correo y nombre para administrar tu cuenta. Nunca compartimos esta información con terceros.",
        ),
    ],
};

const UNAUTHORIZED: Page = Page {
    slug: "unauthorized",
    title: "Acceso restringido",
    sections: &[(
        "No tienes permiso para ver esta página",
        "Esta sección es solo para administradores. Si crees que es un error, contacta al equipo de FIME-NET.",
    )],
};

fn render(page: &Page) -> Json<PageResponse> {
    Json(PageResponse {
        slug: page.slug,
        title: page.title,
        sections: page
            .sections
            .iter()
            .map(|&(heading, body)| SectionResponse { heading, body })
            .collect(),
    })
}

#[utoipa::path(get, path = "/", responses((status = 200, body = PageResponse)), tag = "Pages")]
pub async fn home() -> Json<PageResponse> {
    render(&HOME)
}

#[utoipa::path(get, path = "/about", responses((status = 200, body = PageResponse)), tag = "Pages")]
pub async fn about() -> Json<PageResponse> {
    render(&ABOUT)
}

#[utoipa::path(get, path = "/community", responses((status = 200, body = PageResponse)), tag = "Pages")]
pub async fn community() -> Json<PageResponse> {
    render(&COMMUNITY)
}

#[utoipa::path(get, path = "/faq", responses((status = 200, body = PageResponse)), tag = "Pages")]
pub async fn faq() -> Json<PageResponse> {
    render(&FAQ)
}

#[utoipa::path(get, path = "/terms", responses((status = 200, body = PageResponse)), tag = "Pages")]
pub async fn terms() -> Json<PageResponse> {
    render(&TERMS)
}

/// Where the admin gate sends signed-in users without the admin role
#[utoipa::path(get, path = "/unauthorized", responses((status = 200, body = PageResponse)), tag = "Pages")]
pub async fn unauthorized() -> Json<PageResponse> {
    render(&UNAUTHORIZED)
}
