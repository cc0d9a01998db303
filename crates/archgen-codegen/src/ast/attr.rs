use archgen_core::schema::StorageType;
use syn::parse::ParseStream;

mod kw {
    syn::custom_keyword!(model);
    syn::custom_keyword!(table);
    syn::custom_keyword!(accessor);
    syn::custom_keyword!(key);
    syn::custom_keyword!(bridge);
    syn::custom_keyword!(primary_key);
    syn::custom_keyword!(nullable);
    syn::custom_keyword!(unique);
    syn::custom_keyword!(column);
    syn::custom_keyword!(default);
    syn::custom_keyword!(mapper);
    syn::custom_keyword!(storage);
}

/// Options of `#[archgen(..)]` on a struct.
///
/// Allowed syntax:
///
/// ```text
/// #[archgen(model)]
/// #[archgen(model, table = "songs", accessor = "Songs")]
/// #[archgen(model, key = UserKey, key = LegacyUser)]
/// #[archgen(model, bridge(left, right))]
/// ```
#[derive(Debug, Default)]
pub(super) struct StructAttr {
    /// Declared as a table model
    pub(super) model: bool,

    pub(super) table: Option<String>,

    pub(super) accessor: Option<String>,

    /// Additional types the table is registered under
    pub(super) keys: Vec<syn::Path>,

    pub(super) bridge: Option<(syn::Ident, syn::Ident)>,
}

/// Options of `#[archgen(..)]` on a field.
///
/// Allowed syntax:
///
/// ```text
/// #[archgen(primary_key)]
/// #[archgen(nullable, unique)]
/// #[archgen(column = "full_name", default = "''")]
/// #[archgen(mapper = "crate::mappers::Csv", storage = "string")]
/// ```
#[derive(Debug, Default)]
pub(super) struct FieldAttr {
    pub(super) primary_key: bool,

    pub(super) nullable: bool,

    pub(super) unique: bool,

    /// Storage name override
    pub(super) column: Option<String>,

    /// Column defaults, one per column
    pub(super) defaults: Vec<String>,

    /// Path of a mapper type and the storage it converts to
    pub(super) mapper: Option<(String, StorageType)>,
}

/// Applies `parse` to the arguments of every `#[archgen(..)]` attribute.
/// Returns false if there is none.
fn each_archgen_attr(
    attrs: &[syn::Attribute],
    mut parse: impl FnMut(ParseStream) -> syn::Result<()>,
) -> syn::Result<bool> {
    let mut found = false;
    for attr in attrs {
        if attr.path().is_ident("archgen") {
            found = true;
            attr.parse_args_with(|input: ParseStream| parse(input))?;
        }
    }
    Ok(found)
}

/// Runs `item` for each comma separated argument.
fn each_arg(
    input: ParseStream,
    mut item: impl FnMut(ParseStream) -> syn::Result<()>,
) -> syn::Result<()> {
    loop {
        if input.is_empty() {
            break;
        }
        item(input)?;
        if input.is_empty() {
            break;
        }
        let _comma_token: syn::Token![,] = input.parse()?;
    }
    Ok(())
}

fn parse_str(input: ParseStream) -> syn::Result<String> {
    let _eq_token: syn::Token![=] = input.parse()?;
    let lit: syn::LitStr = input.parse()?;
    Ok(lit.value())
}

fn set_once<T>(slot: &mut Option<T>, value: T, name: &str, input: ParseStream) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            input.span(),
            format!("duplicate `{name}` attribute"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

impl StructAttr {
    /// `None` when the struct carries no `#[archgen]` attribute.
    pub(super) fn from_ast(attrs: &[syn::Attribute]) -> syn::Result<Option<StructAttr>> {
        let mut result = StructAttr::default();
        let found = each_archgen_attr(attrs, |input| {
            each_arg(input, |input| result.parse_arg(input))
        })?;
        Ok(found.then_some(result))
    }

    fn parse_arg(&mut self, input: ParseStream) -> syn::Result<()> {
        let lookahead = input.lookahead1();

        if lookahead.peek(kw::model) {
            let _kw: kw::model = input.parse()?;
            self.model = true;
        } else if lookahead.peek(kw::table) {
            let _kw: kw::table = input.parse()?;
            let table = parse_str(input)?;
            set_once(&mut self.table, table, "table", input)?;
        } else if lookahead.peek(kw::accessor) {
            let _kw: kw::accessor = input.parse()?;
            let accessor = parse_str(input)?;
            set_once(&mut self.accessor, accessor, "accessor", input)?;
        } else if lookahead.peek(kw::key) {
            let _kw: kw::key = input.parse()?;
            let _eq_token: syn::Token![=] = input.parse()?;
            self.keys.push(input.parse()?);
        } else if lookahead.peek(kw::bridge) {
            let _kw: kw::bridge = input.parse()?;
            let content;
            syn::parenthesized!(content in input);
            let left: syn::Ident = content.parse()?;
            let _comma_token: syn::Token![,] = content.parse()?;
            let right: syn::Ident = content.parse()?;
            set_once(&mut self.bridge, (left, right), "bridge", input)?;
        } else {
            return Err(lookahead.error());
        }

        Ok(())
    }
}

impl FieldAttr {
    pub(super) fn from_ast(attrs: &[syn::Attribute]) -> syn::Result<FieldAttr> {
        let mut result = FieldAttr::default();
        let mut mapper = None;
        let mut storage = None;

        each_archgen_attr(attrs, |input| {
            each_arg(input, |input| {
                let lookahead = input.lookahead1();

                if lookahead.peek(kw::primary_key) {
                    let _kw: kw::primary_key = input.parse()?;
                    result.primary_key = true;
                } else if lookahead.peek(kw::nullable) {
                    let _kw: kw::nullable = input.parse()?;
                    result.nullable = true;
                } else if lookahead.peek(kw::unique) {
                    let _kw: kw::unique = input.parse()?;
                    result.unique = true;
                } else if lookahead.peek(kw::column) {
                    let _kw: kw::column = input.parse()?;
                    let column = parse_str(input)?;
                    set_once(&mut result.column, column, "column", input)?;
                } else if lookahead.peek(kw::default) {
                    let _kw: kw::default = input.parse()?;
                    result.defaults.push(parse_str(input)?);
                } else if lookahead.peek(kw::mapper) {
                    let keyword: kw::mapper = input.parse()?;
                    let path = parse_str(input)?;
                    set_once(&mut mapper, (path, keyword.span), "mapper", input)?;
                } else if lookahead.peek(kw::storage) {
                    let keyword: kw::storage = input.parse()?;
                    let name = parse_str(input)?;
                    let ty = StorageType::ALL
                        .into_iter()
                        .find(|ty| ty.name() == name)
                        .ok_or_else(|| {
                            syn::Error::new(keyword.span, format!("unknown storage type `{name}`"))
                        })?;
                    set_once(&mut storage, (ty, keyword.span), "storage", input)?;
                } else {
                    return Err(lookahead.error());
                }

                Ok(())
            })
        })?;

        result.mapper = match (mapper, storage) {
            (Some((path, _)), Some((storage, _))) => Some((path, storage)),
            (None, None) => None,
            (Some((_, span)), None) => {
                return Err(syn::Error::new(span, "`mapper` requires `storage`"))
            }
            (None, Some((_, span))) => {
                return Err(syn::Error::new(span, "`storage` requires `mapper`"))
            }
        };

        Ok(result)
    }
}
