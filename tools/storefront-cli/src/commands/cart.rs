//! Cart commands.

use anyhow::{anyhow, bail, Context as _, Result};
use dialoguer::Confirm;
use serde::Serialize;
use storefront_commerce::prelude::*;
use storefront_data::StorefrontClient;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::short_id;

const TABLE_WIDTHS: [usize; 6] = [3, 8, 24, 12, 5, 12];

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut snapshot = ctx.load_cart()?;

    match args.command {
        CartCommand::Show => return show_cart(&snapshot, ctx),
        CartCommand::Add {
            product_id,
            color,
            size,
            quantity,
            title,
            price,
            image,
        } => {
            let name = match (title, price) {
                (Some(title), Some(price)) => {
                    let product = offline_product(&product_id, title, price, image.as_deref(), ctx)?;
                    let name = product.title.clone();
                    snapshot.state =
                        reduce(&snapshot.state, CartAction::add(product, color, size, quantity))?;
                    name
                }
                _ => {
                    let client = ctx.client()?;
                    let product = fetch_product(&client, &product_id, ctx).await?;
                    snapshot.state.add_selected(&product, &color, &size, quantity, |path| {
                        client.config().image_url(path)
                    })?;
                    product.name
                }
            };
            ctx.output.success(&format!("Added {quantity} × {name}"));
        }
        CartCommand::Remove { line } => {
            let cart_id = resolve_line(&snapshot.state, &line);
            let existed = snapshot.state.get(&cart_id).is_some();
            snapshot.state = reduce(&snapshot.state, CartAction::remove(cart_id))?;
            if existed {
                ctx.output.success("Removed");
            } else {
                warn_no_match(&line, ctx);
            }
        }
        CartCommand::Update { line, quantity } => {
            let cart_id = resolve_line(&snapshot.state, &line);
            let existed = snapshot.state.get(&cart_id).is_some();
            snapshot.state = reduce(
                &snapshot.state,
                CartAction::update_quantity(cart_id.clone(), quantity),
            )?;
            if !existed {
                warn_no_match(&line, ctx);
            }
        }
        CartCommand::Inc { line } => {
            let cart_id = resolve_line(&snapshot.state, &line);
            if !snapshot.state.increment(&cart_id)? {
                warn_no_match(&line, ctx);
            }
        }
        CartCommand::Dec { line } => {
            let cart_id = resolve_line(&snapshot.state, &line);
            if !snapshot.state.decrement(&cart_id) {
                warn_no_match(&line, ctx);
            }
        }
        CartCommand::Clear { yes } => {
            if !snapshot.state.is_empty() && !yes && !ctx.output.is_json() && console::user_attended() {
                let confirmed = Confirm::new()
                    .with_prompt("Remove every item from the cart?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.warn("Cart left unchanged");
                    return Ok(());
                }
            }
            snapshot.state = reduce(&snapshot.state, CartAction::Clear)?;
            ctx.output.success("Cart cleared");
        }
    }

    ctx.save_cart(&mut snapshot)?;
    show_cart(&snapshot, ctx)
}

/// Build a cart product from command-line fields.
fn offline_product(
    product_id: &str,
    title: String,
    price: f64,
    image: Option<&str>,
    ctx: &Context,
) -> Result<CartProduct> {
    let currency = ctx.config.currency()?;
    let price = Money::from_decimal(price, currency)
        .ok_or_else(|| anyhow!("Invalid price: {price}"))?;
    let mut product = CartProduct::new(product_id, title, price);
    if let Some(image) = image {
        product = product.with_image(ctx.config.api.image_url(image));
    }
    Ok(product)
}

/// Look the product up in the catalog.
async fn fetch_product(client: &StorefrontClient, product_id: &str, ctx: &Context) -> Result<ProductSnapshot> {
    let spinner = ctx.output.spinner("Fetching product...");
    let result = client.fetch_product(&ProductId::new(product_id)).await;
    spinner.finish_and_clear();

    match result {
        Ok(product) => Ok(product),
        Err(e) if e.status() == Some(404) => bail!("Product {product_id} not found"),
        Err(e) => Err(e).with_context(|| format!("Failed to fetch product {product_id}")),
    }
}

/// Map what the user typed to a line id.
///
/// Accepts a full id, a 1-based line number, or an id prefix that
/// matches exactly one line. Anything else is passed through unchanged,
/// which the cart treats as a no-op.
pub fn resolve_line(state: &CartState, input: &str) -> CartItemId {
    let input = input.trim();
    let exact = CartItemId::new(input);
    if state.get(&exact).is_some() {
        return exact;
    }

    if let Ok(n) = input.parse::<usize>() {
        if let Some(item) = n.checked_sub(1).and_then(|i| state.items.get(i)) {
            return item.cart_id.clone();
        }
    }

    let mut matches = state
        .items
        .iter()
        .filter(|item| !input.is_empty() && item.cart_id.as_str().starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(item), None) => item.cart_id.clone(),
        _ => exact,
    }
}

fn warn_no_match(line: &str, ctx: &Context) {
    ctx.output.warn(&format!("No cart line matches '{line}'"));
}

#[derive(Serialize)]
struct CartView<'a> {
    session_id: &'a SessionId,
    currency: &'static str,
    items: Vec<LineView<'a>>,
    item_count: i64,
    subtotal: f64,
    shipping: f64,
    total: f64,
}

#[derive(Serialize)]
struct LineView<'a> {
    cart_id: &'a CartItemId,
    product_id: &'a ProductId,
    title: &'a str,
    color: &'a str,
    size: &'a str,
    image: &'a str,
    quantity: i64,
    unit_price: f64,
    line_total: f64,
}

fn cart_view<'a>(snapshot: &'a CartSnapshot, pricing: &CartPricing) -> Result<CartView<'a>> {
    let items = snapshot
        .state
        .items
        .iter()
        .zip(&pricing.line_items)
        .map(|(item, line)| LineView {
            cart_id: &item.cart_id,
            product_id: &item.product_id,
            title: &item.title,
            color: &item.color,
            size: &item.size,
            image: &item.image,
            quantity: item.quantity,
            unit_price: line.unit_price.to_decimal(),
            line_total: line.line_total.to_decimal(),
        })
        .collect();

    Ok(CartView {
        session_id: &snapshot.session_id,
        currency: snapshot.state.currency.code(),
        items,
        item_count: snapshot.state.item_count()?,
        subtotal: pricing.subtotal.to_decimal(),
        shipping: pricing.shipping.to_decimal(),
        total: pricing.total.to_decimal(),
    })
}

/// Render a line's color and size, e.g. `"Black / M"`.
pub fn variant_label(item: &LineItem) -> String {
    [item.color.as_str(), item.size.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Print the cart table and totals.
pub fn show_cart(snapshot: &CartSnapshot, ctx: &Context) -> Result<()> {
    let pricing = CartPricing::calculate(&snapshot.state, &ctx.pricing()?)?;

    if ctx.output.is_json() {
        ctx.output.json(&cart_view(snapshot, &pricing)?);
        return Ok(());
    }

    let state = &snapshot.state;
    ctx.output.header(&format!(
        "Cart ({} lines, {} items)",
        state.len(),
        state.item_count()?
    ));

    if state.is_empty() {
        ctx.output.info("Your cart is empty");
    } else {
        ctx.output.table_row(&["#", "ID", "Item", "Variant", "Qty", "Total"], &TABLE_WIDTHS);
        for (index, (item, line)) in state.items.iter().zip(&pricing.line_items).enumerate() {
            let number = (index + 1).to_string();
            let quantity = item.quantity.to_string();
            let total = line.line_total.display();
            let variant = variant_label(item);
            ctx.output.table_row(
                &[
                    &number,
                    short_id(item.cart_id.as_str()),
                    &item.title,
                    &variant,
                    &quantity,
                    &total,
                ],
                &TABLE_WIDTHS,
            );
        }
    }

    println!();
    ctx.output.kv("Subtotal", &pricing.subtotal.display());
    ctx.output.kv("Shipping", &pricing.shipping.display());
    ctx.output.kv("Total", &pricing.total.display());
    Ok(())
}
