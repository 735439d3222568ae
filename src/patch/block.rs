//! Rendering of the CORS / REST framework settings block

use minijinja::{context, Environment};

use crate::config::Config;
use crate::error::Result;

/// Block appended to the end of the settings module
const CORS_BLOCK_TEMPLATE: &str = r#"

# CORS settings
CORS_ALLOWED_ORIGINS = [
{% for origin in origins %}
    "{{ origin }}",
{% endfor %}
]

CORS_ALLOW_CREDENTIALS = {{ allow_credentials }}

# REST Framework settings
REST_FRAMEWORK = {
    'DEFAULT_PERMISSION_CLASSES': [
{% for cls in permission_classes %}
        '{{ cls }}',
{% endfor %}
    ],
    'DEFAULT_AUTHENTICATION_CLASSES': [
{% for cls in authentication_classes %}
        '{{ cls }}',
{% endfor %}
    ],
}
"#;

/// Render the CORS / REST framework block for `config`
pub fn render_cors_block(config: &Config) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template("cors_block", CORS_BLOCK_TEMPLATE)?;

    let template = env.get_template("cors_block")?;
    let rendered = template.render(context! {
        origins => config.cors.allowed_origins,
        allow_credentials => python_bool(config.cors.allow_credentials),
        permission_classes => config.rest_framework.permission_classes,
        authentication_classes => config.rest_framework.authentication_classes,
    })?;

    Ok(rendered)
}

fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
