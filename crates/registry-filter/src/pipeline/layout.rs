/// A single output column and, when the source layout declares it, the
/// zero-based position it is read from in the raw delimited row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub position: Option<usize>,
}

const fn field(name: &'static str, position: usize) -> FieldSpec {
    FieldSpec {
        name,
        position: Some(position),
    }
}

/// Static column layout of one record type.
///
/// The field order is also the output schema order, so a projected
/// [`Record`](super::Record) can be indexed with the same positions as
/// [`FieldLayout::fields`].
#[derive(Debug, PartialEq, Eq)]
pub struct FieldLayout {
    record_type: &'static str,
    fields: &'static [FieldSpec],
}

impl FieldLayout {
    pub fn record_type(&self) -> &'static str {
        self.record_type
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn header(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// Output column indices of the establishment fields the filter touches.
pub(crate) mod establishment_columns {
    pub(crate) const BASE_ID: usize = 0;
    pub(crate) const STATUS: usize = 5;
    pub(crate) const PRIMARY_CODE: usize = 11;
}

/// Output column indices of the company fields the filter touches.
pub(crate) mod company_columns {
    pub(crate) const BASE_ID: usize = 0;
}

pub static ESTABLISHMENT_LAYOUT: FieldLayout = FieldLayout {
    record_type: "establishment",
    fields: &[
        field("CNPJ_BASICO", 0),
        field("CNPJ_ORDEM", 1),
        field("CNPJ_DV", 2),
        field("IDENTIFICADOR_MATRIZ_FILIAL", 3),
        field("NOME_FANTASIA", 4),
        field("SITUACAO_CADASTRAL", 5),
        field("DATA_SITUACAO_CADASTRAL", 6),
        field("MOTIVO_SITUACAO_CADASTRAL", 7),
        field("NOME_CIDADE_EXTERIOR", 8),
        field("PAIS", 9),
        field("DATA_INICIO_ATIVIDADE", 10),
        field("CNAE_FISCAL_PRINCIPAL", 11),
        field("CNAE_FISCAL_SECUNDARIA", 12),
        // Address
        field("TIPO_LOGRADOURO", 13),
        field("LOGRADOURO", 14),
        field("NUMERO", 15),
        field("COMPLEMENTO", 16),
        field("BAIRRO", 17),
        field("CEP", 18),
        field("UF", 19),
        field("MUNICIPIO", 20),
        // Contact
        field("DDD1", 21),
        field("TELEFONE1", 22),
        field("DDD2", 23),
        field("TELEFONE2", 24),
        field("DDD_FAX", 25),
        field("FAX", 26),
        field("CORREIO_ELETRONICO", 27),
        field("SITUACAO_ESPECIAL", 28),
        field("DATA_SITUACAO_ESPECIAL", 29),
    ],
};

pub static COMPANY_LAYOUT: FieldLayout = FieldLayout {
    record_type: "company",
    fields: &[
        field("CNPJ_BASICO", 0),
        field("RAZAO_SOCIAL", 1),
        field("NATUREZA_JURIDICA", 2),
        field("QUALIFICACAO_DO_RESPONSAVEL", 3),
        field("CAPITAL_SOCIAL", 4),
        field("PORTE", 5),
        field("ENTE_FEDERATIVO", 6),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn column_indices_point_at_the_expected_fields() {
        let layout = &ESTABLISHMENT_LAYOUT;
        assert_eq!(
            layout.index_of("CNPJ_BASICO"),
            Some(establishment_columns::BASE_ID)
        );
        assert_eq!(
            layout.index_of("SITUACAO_CADASTRAL"),
            Some(establishment_columns::STATUS)
        );
        assert_eq!(
            layout.index_of("CNAE_FISCAL_PRINCIPAL"),
            Some(establishment_columns::PRIMARY_CODE)
        );
        assert_eq!(
            COMPANY_LAYOUT.index_of("CNPJ_BASICO"),
            Some(company_columns::BASE_ID)
        );
    }

    #[test]
    fn layouts_have_unique_names_and_positions() {
        for layout in [&ESTABLISHMENT_LAYOUT, &COMPANY_LAYOUT] {
            let names: HashSet<_> = layout.header().collect();
            assert_eq!(names.len(), layout.len(), "{}", layout.record_type());

            let positions: HashSet<_> = layout
                .fields()
                .iter()
                .filter_map(|field| field.position)
                .collect();
            assert_eq!(positions.len(), layout.len(), "{}", layout.record_type());
        }
    }

    #[test]
    fn layout_sizes_match_registry_files() {
        assert_eq!(ESTABLISHMENT_LAYOUT.len(), 30);
        assert_eq!(COMPANY_LAYOUT.len(), 7);
        assert_eq!(COMPANY_LAYOUT.header().last(), Some("ENTE_FEDERATIVO"));
    }
}
